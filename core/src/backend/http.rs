//! HTTP Backend
//!
//! reqwest client for the chat and probe endpoints.
//!
//! # Wire format
//!
//! ```text
//! POST <chat>   {"message": "Hello"}              → 200 {"reply": "Hi there"}
//! POST <probe>  {"source":"faqchat","request":"document"} → 2xx (body ignored)
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::traits::{ChatBackend, FetchError, ProbeBackend};
use crate::config::WidgetConfig;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    reply: String,
}

/// Interpret a chat endpoint response
///
/// Non-2xx is a status error regardless of the body. A 2xx body must be a
/// JSON object with a string `reply`.
pub fn parse_reply(status: StatusCode, body: &str) -> Result<String, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }
    serde_json::from_str::<ChatReply>(body)
        .map(|parsed| parsed.reply)
        .map_err(|e| FetchError::Malformed(e.to_string()))
}

/// HTTP backend for both endpoints
#[derive(Clone, Debug)]
pub struct HttpBackend {
    chat_url: Url,
    probe_url: Url,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend; `timeout` bounds every request
    pub fn new(chat_url: Url, probe_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            chat_url,
            probe_url,
            timeout,
            http_client,
        })
    }

    /// Create from the widget configuration
    pub fn from_config(config: &WidgetConfig) -> Result<Self, FetchError> {
        Self::new(
            config.chat_endpoint.clone(),
            config.probe_endpoint.clone(),
            config.request_timeout,
        )
    }

    /// Chat endpoint URL
    #[must_use]
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Probe endpoint URL
    #[must_use]
    pub fn probe_url(&self) -> &Url {
        &self.probe_url
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn send_message(&self, message: &str) -> Result<String, FetchError> {
        tracing::debug!(url = %self.chat_url, len = message.len(), "Posting chat message");

        let response = self
            .http_client
            .post(self.chat_url.clone())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        parse_reply(status, &body)
    }
}

#[async_trait]
impl ProbeBackend for HttpBackend {
    async fn probe(&self) -> Result<(), FetchError> {
        tracing::debug!(url = %self.probe_url, "Probing document endpoint");

        let response = self
            .http_client
            .post(self.probe_url.clone())
            .json(&serde_json::json!({
                "source": "faqchat",
                "request": "document",
            }))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(FetchError::Status {
                status: status.as_u16(),
            })
        }
    }
}
