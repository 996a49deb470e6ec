//! Store errors.

use thiserror::Error;

/// Errors that can occur when talking to the document store or object storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx response or an unexpected body.
    #[error("unexpected response from store: {0}")]
    UnexpectedResponse(String),

    /// The addressed document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection that was addressed
        collection: String,
        /// Document identifier
        id: String,
    },
}
