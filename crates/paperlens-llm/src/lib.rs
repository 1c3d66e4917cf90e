//! paperlens-llm — Chat-completion client layer.
//! - OpenAI-style request/response types
//! - Transport seam (`ChatTransport`) with a reqwest implementation
//! - Resilient delivery: exponential backoff on transient failures
//! - Usage/cost accounting for observability

pub mod client;
pub mod error;
pub mod probe;
pub mod retry;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{ChatClient, Pricing};
pub use error::LlmError;
pub use retry::RetryPolicy;
pub use transport::{ChatTransport, HttpTransport};
pub use types::{ChatReply, ChatRequest, Message, Usage};
