//! Connectivity probe.
//!
//! Sends the cheapest possible request before a run so a bad
//! credential or an unreachable endpoint is reported up front instead
//! of surfacing as per-chunk failure markers.

use tracing::{error, info, warn};

use crate::client::ChatClient;
use crate::types::{ChatRequest, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ok,
    RateLimited,
    Failed(u16),
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeOutcome::Ok)
    }
}

pub async fn check_connection(client: &ChatClient, model: &str) -> ProbeOutcome {
    let request = ChatRequest::new(model, vec![Message::user("Hello")], 0.7);
    match client.send(&request).await {
        Ok(reply) if reply.is_success() => {
            info!("API connection ok");
            ProbeOutcome::Ok
        }
        Ok(reply) if reply.status == 429 => {
            warn!("API rate limited, try again later");
            ProbeOutcome::RateLimited
        }
        Ok(reply) => {
            error!(
                status = reply.status,
                error = reply.error_message().unwrap_or("unknown"),
                "API connection failed"
            );
            ProbeOutcome::Failed(reply.status)
        }
        Err(e) => {
            error!(error = %e, "API unreachable");
            ProbeOutcome::Unreachable(e.to_string())
        }
    }
}
