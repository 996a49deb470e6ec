//! Object storage.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use super::{HttpStoreConfig, StoreError, ensure_success};

/// Blob storage returning publicly readable URLs.
#[automock]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns the public download URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError>;
}

/// HTTP client for the hosted object storage bucket.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    config: HttpStoreConfig,
    http: Client,
}

impl HttpObjectStorage {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: HttpStoreConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    download_url: String,
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let mut segments = vec!["objects"];
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));

        let size = bytes.len();

        let response = self
            .http
            .put(self.config.url(&segments))
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let uploaded: UploadResponse = ensure_success(response, "upload").await?.json().await?;

        debug!(%path, size, "object uploaded");

        Ok(uploaded.download_url)
    }
}
