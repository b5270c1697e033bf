//! Backend Traits
//!
//! The two remote collaborators of the widget: the chat endpoint that answers
//! user messages and the probe endpoint hit before a document is produced.
//! Keeping them behind traits lets tests drive the widget with in-memory
//! backends and lets the HTTP details live in one place.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors on the reply and probe paths
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Another request is already outstanding
    #[error("a request is already in flight")]
    Busy,

    /// The request never produced an HTTP response
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response body was not the expected JSON shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No response within the configured timeout
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Whether the failure is reported to the user as a connection error
    ///
    /// `Busy` is a rejected call, not a failed one; every other variant
    /// surfaces as the same notice.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        !matches!(self, Self::Busy)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Chat endpoint
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logs (e.g., "HTTP")
    fn name(&self) -> &str;

    /// Send one user message and return the reply text
    async fn send_message(&self, message: &str) -> Result<String, FetchError>;
}

/// Probe endpoint hit before a document is synthesized
#[async_trait]
pub trait ProbeBackend: Send + Sync {
    /// Issue the probe; the response body is ignored
    async fn probe(&self) -> Result<(), FetchError>;
}
