//! Chunked answer synthesizer.
//!
//! Per question: chunk the document, request an answer per chunk in
//! index order, then merge the partial answers with a low-temperature
//! synthesis call. One chunk short-circuits straight to its answer.
//!
//! Failures never escape: a failed chunk call becomes a visible marker
//! in the merge input, a failed merge becomes a fixed placeholder, so
//! the driver can always continue with the next question. Chunks are
//! processed strictly sequentially with a fixed delay between calls to
//! stay inside the endpoint's rate limits.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use paperlens_document::{chunker, Chunk};
use paperlens_llm::ChatClient;

use crate::prompts;

/// Answer text used when the synthesis call itself fails.
pub const FAILURE_PLACEHOLDER: &str = "No answer could be obtained; the API call failed.";

#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    pub model: String,
    /// Maximum characters of document text per model call.
    pub chunk_size: usize,
    /// Pause after every chunk request, regardless of outcome.
    pub inter_call_delay: Duration,
    pub chunk_temperature: f32,
    /// Near-deterministic setting for the merge pass.
    pub merge_temperature: f32,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo-preview".to_string(),
            chunk_size: 12_000,
            inter_call_delay: Duration::from_secs(1),
            chunk_temperature: 0.7,
            merge_temperature: 0.1,
        }
    }
}

pub struct ChunkedSynthesizer {
    client: ChatClient,
    config: SynthesizerConfig,
}

impl ChunkedSynthesizer {
    pub fn new(client: ChatClient, config: SynthesizerConfig) -> Self {
        Self { client, config }
    }

    /// Produce the final answer for one question. Infallible by
    /// design: every failure path degrades to placeholder text.
    pub async fn answer(&self, document: &str, question: &str) -> String {
        let chunks = chunker::split(document, self.config.chunk_size);
        let total = chunks.len();
        debug!(question, chunks = total, "Answering question");

        let mut partials: Vec<String> = Vec::with_capacity(total);
        for chunk in &chunks {
            let request = prompts::chunk_request(
                &self.config.model,
                chunk,
                question,
                self.config.chunk_temperature,
            );
            let partial = match self.client.send(&request).await {
                Ok(reply) if reply.is_success() => match reply.content() {
                    Some(text) => text.trim().to_string(),
                    None => {
                        warn!(chunk = chunk.index, "200 response without answer content");
                        failure_marker(chunk, "malformed response")
                    }
                },
                Ok(reply) => {
                    warn!(
                        chunk = chunk.index,
                        status = reply.status,
                        "Chunk request failed, continuing with remaining chunks"
                    );
                    failure_marker(chunk, &format!("status {}", reply.status))
                }
                Err(e) => {
                    warn!(
                        chunk = chunk.index,
                        error = %e,
                        "Chunk request error, continuing with remaining chunks"
                    );
                    failure_marker(chunk, "transport error")
                }
            };
            partials.push(partial);

            // Rate-limit compliance, applied even after a failure.
            sleep(self.config.inter_call_delay).await;
        }

        if partials.len() == 1 {
            return partials.pop().unwrap_or_default();
        }

        let request = prompts::merge_request(
            &self.config.model,
            question,
            &partials,
            self.config.merge_temperature,
        );
        match self.client.send(&request).await {
            Ok(reply) if reply.is_success() => match reply.content() {
                Some(text) => {
                    info!(question, chunks = total, "Answer synthesized");
                    text.trim().to_string()
                }
                None => {
                    error!(question, "Synthesis response carried no content");
                    FAILURE_PLACEHOLDER.to_string()
                }
            },
            Ok(reply) => {
                error!(question, status = reply.status, "Synthesis call failed");
                FAILURE_PLACEHOLDER.to_string()
            }
            Err(e) => {
                error!(question, error = %e, "Synthesis call error");
                FAILURE_PLACEHOLDER.to_string()
            }
        }
    }
}

fn failure_marker(chunk: &Chunk, reason: &str) -> String {
    format!(
        "[part {}/{}: no answer, request failed ({reason})]",
        chunk.index, chunk.total
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use paperlens_llm::testing::{ok_reply, status_reply, ScriptedTransport};
    use paperlens_llm::RetryPolicy;

    fn synthesizer(transport: Arc<ScriptedTransport>, chunk_size: usize) -> ChunkedSynthesizer {
        let client = ChatClient::new(transport, RetryPolicy::new(1, Duration::from_millis(1)));
        ChunkedSynthesizer::new(
            client,
            SynthesizerConfig {
                model: "test-model".to_string(),
                chunk_size,
                inter_call_delay: Duration::ZERO,
                ..SynthesizerConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_single_chunk_short_circuits() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok_reply("  direct answer  ")]));
        let synth = synthesizer(transport.clone(), 1000);

        let answer = synth.answer("short document", "Q?").await;

        assert_eq!(answer, "direct answer");
        // Exactly one request: no merge call for a single chunk.
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_multi_chunk_issues_n_plus_one_requests() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ok_reply("part one"),
            ok_reply("part two"),
            ok_reply("part three"),
            ok_reply("merged answer"),
        ]));
        // 9 chars / 3 = 3 chunks.
        let synth = synthesizer(transport.clone(), 3);

        let answer = synth.answer("abcdefghi", "Q?").await;

        assert_eq!(answer, "merged answer");
        assert_eq!(transport.calls(), 4);

        // Chunk requests carry their position; the last is the merge.
        let requests = transport.requests();
        assert!(requests[0].messages[1].content.contains("part 1 of 3"));
        assert!(requests[2].messages[1].content.contains("part 3 of 3"));
        assert!(requests[3].messages[1].content.contains("part one"));
        assert!(requests[3].messages[1].content.contains("part three"));
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_abort_question() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ok_reply("first"),
            status_reply(404),
            ok_reply("third"),
            ok_reply("merged"),
        ]));
        let synth = synthesizer(transport.clone(), 3);

        let answer = synth.answer("abcdefghi", "Q?").await;

        assert_eq!(answer, "merged");
        assert_eq!(transport.calls(), 4);
        let merge_input = &transport.requests()[3].messages[1].content;
        assert!(merge_input.contains("first"));
        assert!(merge_input.contains("[part 2/3: no answer, request failed (status 404)]"));
        assert!(merge_input.contains("third"));
    }

    #[tokio::test]
    async fn test_failed_merge_degrades_to_placeholder() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ok_reply("one"),
            ok_reply("two"),
            status_reply(500),
        ]));
        let synth = synthesizer(transport.clone(), 3);

        let answer = synth.answer("abcdef", "Q?").await;

        assert_eq!(answer, FAILURE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_single_chunk_failure_becomes_marker_answer() {
        let transport = Arc::new(ScriptedTransport::new(vec![status_reply(400)]));
        let synth = synthesizer(transport, 1000);

        let answer = synth.answer("doc", "Q?").await;

        assert_eq!(answer, "[part 1/1: no answer, request failed (status 400)]");
    }
}
