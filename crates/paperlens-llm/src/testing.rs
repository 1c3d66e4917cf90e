//! Test support: a scripted [`ChatTransport`].
//!
//! Queue up replies and transport failures, then assert on the
//! requests the code under test actually issued. Available to
//! downstream crates behind the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! paperlens-llm = { path = "../paperlens-llm", features = ["testing"] }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::error::LlmError;
use crate::transport::ChatTransport;
use crate::types::{ChatReply, ChatRequest};

pub enum ScriptStep {
    /// Reply with this status and JSON body.
    Reply(u16, serde_json::Value),
    /// Fail at the transport level (connect error, timeout).
    Fail(String),
}

/// A 200 reply carrying `content` and a small usage object.
pub fn ok_reply(content: &str) -> ScriptStep {
    ScriptStep::Reply(
        200,
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15},
        }),
    )
}

/// An error-status reply with an OpenAI-style error body.
pub fn status_reply(status: u16) -> ScriptStep {
    ScriptStep::Reply(status, json!({"error": {"message": "simulated failure"}}))
}

/// Transport that replays a fixed script and records every request.
/// An exhausted script fails the exchange, so tests asserting "no
/// further calls" catch any extra request loudly.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<ScriptStep>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of requests issued so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Snapshot of all issued requests, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn execute(&self, request: &ChatRequest) -> Result<ChatReply, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.steps.lock().unwrap().pop_front() {
            Some(ScriptStep::Reply(status, body)) => Ok(ChatReply { status, body }),
            Some(ScriptStep::Fail(message)) => Err(LlmError::Unavailable(message)),
            None => Err(LlmError::Unavailable("transport script exhausted".to_string())),
        }
    }
}
