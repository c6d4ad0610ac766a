//! `storefront-api` — HTTP surface for the product catalog.
//!
//! Thin glue: handlers deserialize input, call the orchestrator, and map
//! errors to consistent JSON responses.

pub mod app;
