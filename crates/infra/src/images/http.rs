//! HTTP client for the remote image-hosting service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{ImageHost, ImageHostError};

/// Image-hosting API client.
///
/// Uploads post the raw payload (e.g. a data URL) and return the hosted
/// locator; deletes address assets by their derived identifier.
pub struct HttpImageHost {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl HttpImageHost {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ImageHostError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ImageHostError::Upload(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from `IMAGE_HOST_URL` / `IMAGE_HOST_KEY`.
    ///
    /// Returns `None` when no endpoint is configured.
    pub fn from_env() -> Option<Result<Self, ImageHostError>> {
        let base_url = std::env::var("IMAGE_HOST_URL").ok()?;
        let api_key = std::env::var("IMAGE_HOST_KEY").unwrap_or_default();
        Some(Self::new(base_url, api_key))
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, payload: &str, folder: &str) -> Result<String, ImageHostError> {
        let url = format!("{}/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "file": payload, "folder": folder }))
            .send()
            .await
            .map_err(|e| ImageHostError::Upload(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ImageHostError::Upload(format!(
                "upload rejected ({status}): {body}"
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::Upload(format!("failed to parse response: {e}")))?;
        Ok(parsed.secure_url)
    }

    async fn delete(&self, asset_id: &str) -> Result<(), ImageHostError> {
        let url = format!("{}/destroy", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "public_id": asset_id }))
            .send()
            .await
            .map_err(|e| ImageHostError::Delete(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        // Unknown identifiers are success: deletes are idempotent.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(ImageHostError::Delete(format!(
            "delete rejected ({status}): {body}"
        )))
    }
}
