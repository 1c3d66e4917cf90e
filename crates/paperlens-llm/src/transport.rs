//! Transport seam for chat-completion calls.
//!
//! `ChatTransport` performs exactly one HTTP exchange; retry policy
//! lives above it in [`crate::client::ChatClient`]. The seam keeps the
//! pipeline testable with a scripted transport.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::LlmError;
use crate::types::{ChatReply, ChatRequest};

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Perform a single request. `Err` means the exchange itself failed
    /// (connect error, timeout); an HTTP error status is still `Ok`.
    async fn execute(&self, request: &ChatRequest) -> Result<ChatReply, LlmError>;
}

/// reqwest-backed transport with bearer authentication.
pub struct HttpTransport {
    endpoint: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn execute(&self, request: &ChatRequest) -> Result<ChatReply, LlmError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        // Error bodies are not always JSON; keep whatever we got.
        let body = serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!(status, error = %e, "Response body is not JSON");
            serde_json::Value::String(text)
        });

        Ok(ChatReply { status, body })
    }
}
