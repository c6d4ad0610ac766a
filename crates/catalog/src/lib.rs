//! `storefront-catalog` — product records, mutation inputs, and projections.
//!
//! The catalog is the durable source of truth for products. This crate holds
//! the record shape and the pure validation rules; persistence and the
//! consistency machinery live in `storefront-infra`.

pub mod product;

pub use product::{
    LeanProduct, NewProduct, Product, ProductDraft, ProductPatch, ProductUpdate,
};
