//! Pipeline driver.
//!
//! Walks the question list in order, skips anything the resumption
//! ledger already covers, and buffers each new section in memory so the
//! output file only ever grows by whole sections. Rerunning the same
//! question set is a no-op beyond the ledger scan.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument};

use paperlens_common::Result;

use crate::ledger;
use crate::synthesizer::ChunkedSynthesizer;

/// How a question's section is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStyle {
    /// `## <question>` followed by the answer.
    Heading,
    /// `## Q: <question>` followed by `A: <answer>`.
    QuestionAnswer,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub answered: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

pub struct PipelineDriver {
    synthesizer: ChunkedSynthesizer,
    /// Top-level heading written when the output file is created.
    title: String,
}

impl PipelineDriver {
    pub fn new(synthesizer: ChunkedSynthesizer, title: impl Into<String>) -> Self {
        Self {
            synthesizer,
            title: title.into(),
        }
    }

    /// Answer every question not already present in the output file,
    /// then persist the new sections in one append.
    #[instrument(skip(self, document, questions))]
    pub async fn run(
        &self,
        document: &str,
        questions: &[String],
        output_path: &Path,
        style: SectionStyle,
    ) -> Result<RunSummary> {
        let t0 = Instant::now();
        let answered_before = ledger::load_answered_questions(output_path);

        let mut buffer = String::new();
        let mut answered = 0;
        let mut skipped = 0;

        for question in questions {
            let question = question.trim();
            if answered_before.contains(question) {
                info!(question, "Already answered in a previous run, skipping");
                skipped += 1;
                continue;
            }

            info!(question, "Processing question");
            let answer = self.synthesizer.answer(document, question).await;
            match style {
                SectionStyle::Heading => {
                    buffer.push_str(&format!("## {question}\n\n{answer}\n\n"));
                }
                SectionStyle::QuestionAnswer => {
                    buffer.push_str(&format!("## Q: {question}\n\nA: {answer}\n\n"));
                }
            }
            answered += 1;
        }

        if buffer.is_empty() {
            info!(path = %output_path.display(), "All questions already answered, nothing to write");
        } else if output_path.exists() {
            append(output_path, &buffer)?;
            info!(path = %output_path.display(), answered, "Sections appended");
        } else {
            std::fs::write(output_path, format!("# {}\n\n{buffer}", self.title))?;
            info!(path = %output_path.display(), answered, "Output file created");
        }

        Ok(RunSummary {
            answered,
            skipped,
            duration_ms: t0.elapsed().as_millis() as u64,
        })
    }
}

fn append(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
    file.write_all(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::synthesizer::SynthesizerConfig;
    use paperlens_llm::testing::{ok_reply, ScriptedTransport};
    use paperlens_llm::{ChatClient, RetryPolicy};

    fn driver(transport: Arc<ScriptedTransport>) -> PipelineDriver {
        let client = ChatClient::new(transport, RetryPolicy::new(1, Duration::from_millis(1)));
        let synth = ChunkedSynthesizer::new(
            client,
            SynthesizerConfig {
                model: "test-model".to_string(),
                chunk_size: 10_000,
                inter_call_delay: Duration::ZERO,
                ..SynthesizerConfig::default()
            },
        );
        PipelineDriver::new(synth, "Document Interpretation")
    }

    fn questions(qs: &[&str]) -> Vec<String> {
        qs.iter().map(|q| q.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fresh_run_creates_file_with_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.md");
        let transport = Arc::new(ScriptedTransport::new(vec![ok_reply("answer one")]));

        let summary = driver(transport)
            .run("doc", &questions(&["Q1"]), &path, SectionStyle::Heading)
            .await
            .unwrap();

        assert_eq!(summary.answered, 1);
        assert_eq!(summary.skipped, 0);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Document Interpretation\n\n"));
        assert!(written.contains("## Q1\n\nanswer one\n"));
    }

    #[tokio::test]
    async fn test_answered_questions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.md");
        std::fs::write(&path, "# Document Interpretation\n\n## Q1\n\nold answer\n\n").unwrap();

        let transport = Arc::new(ScriptedTransport::new(vec![ok_reply("answer two")]));
        let summary = driver(transport.clone())
            .run("doc", &questions(&["Q1", "Q2"]), &path, SectionStyle::Heading)
            .await
            .unwrap();

        // Only Q2 reached the model.
        assert_eq!(summary.answered, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(transport.calls(), 1);
        assert!(transport.requests()[0].messages[1].content.contains("Q2"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("old answer"));
        assert!(written.contains("## Q2\n\nanswer two\n"));
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.md");

        let transport = Arc::new(ScriptedTransport::new(vec![
            ok_reply("a1"),
            ok_reply("a2"),
        ]));
        let qs = questions(&["Q1", "Q2"]);
        driver(transport)
            .run("doc", &qs, &path, SectionStyle::Heading)
            .await
            .unwrap();
        let after_first = std::fs::read_to_string(&path).unwrap();

        // Empty script: any model call on the rerun would fail loudly.
        let rerun_transport = Arc::new(ScriptedTransport::empty());
        let summary = driver(rerun_transport.clone())
            .run("doc", &qs, &path, SectionStyle::Heading)
            .await
            .unwrap();

        assert_eq!(summary.answered, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(rerun_transport.calls(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_question_answer_style_resumes_across_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.md");

        let transport = Arc::new(ScriptedTransport::new(vec![ok_reply("labelled answer")]));
        driver(transport)
            .run("doc", &questions(&["Q1"]), &path, SectionStyle::QuestionAnswer)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## Q: Q1\n\nA: labelled answer\n"));

        // The ledger strips the label, so the same question is skipped.
        let rerun_transport = Arc::new(ScriptedTransport::empty());
        let summary = driver(rerun_transport.clone())
            .run("doc", &questions(&["Q1"]), &path, SectionStyle::Heading)
            .await
            .unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(rerun_transport.calls(), 0);
    }
}
