//! Document store.

use async_trait::async_trait;
use catalog::normalize::RawRecord;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{HttpStoreConfig, StoreError, ensure_success};

/// Document fields keyed by wire name.
pub type Fields = Map<String, Value>;

/// Persistence for loosely typed documents grouped into collections.
#[automock]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in `collection`, in store order.
    async fn list_all(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// A single document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawRecord>, StoreError>;

    /// Creates a document and returns the identifier the store assigned.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Overwrites the given fields of an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merges the given fields into a document, creating it if needed.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Permanently removes a document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// JSON REST client for the hosted document store.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    config: HttpStoreConfig,
    http: Client,
}

impl HttpDocumentStore {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: HttpStoreConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn write(
        &self,
        method: reqwest::Method,
        collection: &str,
        id: &str,
        fields: Option<Fields>,
    ) -> Result<(), StoreError> {
        let url = self.config.url(&[collection, id]);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.config.api_key);

        if let Some(fields) = fields {
            request = request.json(&fields);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        ensure_success(response, method.as_str()).await?;

        debug!(%collection, %id, %method, "document written");

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        let response = self
            .http
            .get(self.config.url(&[collection]))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let records: Vec<RawRecord> = ensure_success(response, "list").await?.json().await?;

        debug!(%collection, count = records.len(), "listed documents");

        Ok(records)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawRecord>, StoreError> {
        let response = self
            .http
            .get(self.config.url(&[collection, id]))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = ensure_success(response, "get").await?.json().await?;

        Ok(Some(record))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let response = self
            .http
            .post(self.config.url(&[collection]))
            .bearer_auth(&self.config.api_key)
            .json(&fields)
            .send()
            .await?;

        let created: CreatedResponse = ensure_success(response, "create").await?.json().await?;

        debug!(%collection, id = %created.id, "document created");

        Ok(created.id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.write(reqwest::Method::PATCH, collection, id, Some(fields))
            .await
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.write(reqwest::Method::PUT, collection, id, Some(fields))
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write(reqwest::Method::DELETE, collection, id, None)
            .await
    }
}
