use reqwest::StatusCode;
use thiserror::Error;

/// Why a directory listing could not be produced.
///
/// None of these stop a crawl: the caller logs them and treats the directory as empty.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("directory {path:?} does not exist in the repository")]
    NotFound { path: String },

    #[error("unexpected status {status} fetching {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not a directory listing: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ListingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ListingError::NotFound { .. })
    }
}
