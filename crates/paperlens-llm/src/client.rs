//! Resilient chat client.
//!
//! Wraps a [`ChatTransport`] with the shared [`RetryPolicy`] and, on
//! success, records token usage and an estimated cost for
//! observability. Cost figures are logged, never persisted.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::retry::RetryPolicy;
use crate::transport::ChatTransport;
use crate::types::{ChatReply, ChatRequest, Usage};

/// Per-thousand-token rates for cost estimation.
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

impl Pricing {
    pub fn estimate(&self, usage: &Usage) -> f64 {
        usage.prompt_tokens as f64 / 1000.0 * self.prompt_per_1k
            + usage.completion_tokens as f64 / 1000.0 * self.completion_per_1k
    }
}

#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn ChatTransport>,
    retry: RetryPolicy,
    pricing: Option<Pricing>,
}

impl ChatClient {
    pub fn new(transport: Arc<dyn ChatTransport>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            retry,
            pricing: None,
        }
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Send one request under the retry policy.
    ///
    /// Transient statuses (429/5xx) are retried with exponential
    /// backoff; when attempts run out the last reply is returned as-is
    /// and the caller checks `status`. Transport failures follow the
    /// same schedule but propagate as `Err` once exhausted.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatReply, LlmError> {
        let mut attempt: u32 = 1;
        loop {
            match self.transport.execute(request).await {
                Ok(reply) => {
                    if self.retry.is_retryable(reply.status) && attempt < self.retry.max_retries {
                        let delay = self.retry.delay_for_attempt(attempt);
                        warn!(
                            status = reply.status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Transient API failure, backing off"
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    if reply.is_success() {
                        self.record_usage(&reply);
                    } else {
                        warn!(
                            status = reply.status,
                            attempt,
                            error = reply.error_message().unwrap_or("unknown"),
                            "API call failed"
                        );
                    }
                    return Ok(reply);
                }
                Err(e) => {
                    if attempt < self.retry.max_retries {
                        let delay = self.retry.delay_for_attempt(attempt);
                        warn!(
                            error = %e,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Transport failure, backing off"
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    fn record_usage(&self, reply: &ChatReply) {
        match reply.usage() {
            Some(usage) => match self.pricing {
                Some(pricing) => info!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    cost_usd = pricing.estimate(&usage),
                    "Token usage"
                ),
                None => info!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    "Token usage"
                ),
            },
            // Non-fatal: some endpoints omit usage entirely.
            None => debug!("No usage object in 200 response"),
        }
    }
}
