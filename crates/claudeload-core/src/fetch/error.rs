//! Fetch error types

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Body(#[from] BodyError),
}

/// Failure while reading a response body
///
/// Cheap to clone so a single upstream failure can be delivered to every
/// reader of a teed body.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BodyError {
    message: Arc<str>,
}

impl BodyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for BodyError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}
