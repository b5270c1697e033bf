//! Reply Fetcher
//!
//! Wraps a [`ChatBackend`] with single-flight gating and a timeout. A second
//! `send` while one is outstanding is rejected with [`FetchError::Busy`]
//! without reaching the backend, whatever the surface does.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::{ChatBackend, FetchError};
use crate::busy::BusyFlag;

/// Default bound on a single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Single-flight reply fetcher
pub struct ReplyFetcher<B: ChatBackend> {
    backend: Arc<B>,
    busy: BusyFlag,
    timeout: Duration,
}

impl<B: ChatBackend> Clone for ReplyFetcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            busy: self.busy.clone(),
            timeout: self.timeout,
        }
    }
}

impl<B: ChatBackend> ReplyFetcher<B> {
    /// Create a fetcher over a shared backend
    pub fn new(backend: Arc<B>, timeout: Duration) -> Self {
        Self {
            backend,
            busy: BusyFlag::new(),
            timeout,
        }
    }

    /// Whether a request is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Send `message` and wait for the reply
    ///
    /// The message is forwarded exactly as given.
    pub async fn send(&self, message: &str) -> Result<String, FetchError> {
        let Some(_guard) = self.busy.try_acquire() else {
            tracing::warn!("Reply fetch rejected: already in flight");
            return Err(FetchError::Busy);
        };

        tracing::info!(backend = self.backend.name(), len = message.len(), "Fetching reply");

        match tokio::time::timeout(self.timeout, self.backend.send_message(message)).await {
            Ok(Ok(reply)) => {
                tracing::info!(len = reply.len(), "Reply received");
                Ok(reply)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Reply fetch failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Reply fetch timed out");
                Err(FetchError::Timeout(self.timeout))
            }
        }
    }
}
