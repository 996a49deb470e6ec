//! External Collaborators
//!
//! The hosted backend is consumed through two narrow seams: a document store holding product
//! and profile documents, and an object storage bucket for product images.

mod documents;
mod errors;
mod objects;

pub use documents::*;
pub use errors::StoreError;
pub use objects::*;

/// Collection holding product documents.
pub const PRODUCTS: &str = "products";

/// Collection holding user profile documents, keyed by user id.
pub const PROFILES: &str = "profiles";

/// Connection settings shared by the HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL, e.g. `"https://store.example.com/v1"`.
    pub base_url: String,

    /// Bearer API key.
    pub api_key: String,
}

impl HttpStoreConfig {
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.trim_end_matches('/').to_string();

        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }

        url
    }
}

async fn ensure_success(
    response: reqwest::Response,
    action: &str,
) -> Result<reqwest::Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    Err(StoreError::UnexpectedResponse(format!(
        "{action} request failed with status {status}: {text}"
    )))
}
