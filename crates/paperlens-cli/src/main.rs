//! Paperlens — chunked LLM interpretation of academic Markdown documents.
//! Entry point for the CLI binary.

mod config;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, warn};

use paperlens_document::SourceDocument;
use paperlens_llm::probe::{check_connection, ProbeOutcome};
use paperlens_llm::{ChatClient, HttpTransport, Pricing, RetryPolicy};
use paperlens_pipeline::{ChunkedSynthesizer, PipelineDriver, SectionStyle, SynthesizerConfig};

fn build_client(llm: &config::LlmConfig, api_key: SecretString) -> anyhow::Result<ChatClient> {
    let transport = HttpTransport::new(
        &llm.endpoint,
        api_key,
        Duration::from_secs(llm.request_timeout_secs),
    )?;
    let retry = RetryPolicy::new(llm.max_retries, Duration::from_secs(llm.base_delay_secs));
    let mut client = ChatClient::new(Arc::new(transport), retry);
    if let Some(ref pricing) = llm.pricing {
        client = client.with_pricing(Pricing {
            prompt_per_1k: pricing.prompt_per_1k,
            completion_per_1k: pricing.completion_per_1k,
        });
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_path = std::env::var("PAPERLENS_LOG").unwrap_or_else(|_| "paperlens.log".to_string());
    logging::init(&log_path)?;

    info!("Paperlens starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Configuration errors are fatal: no useful work without them.
    let config = config::Config::load()?;
    info!(
        model = %config.llm.model,
        chunk_size = config.pipeline.chunk_size,
        "Configuration loaded"
    );

    let api_key = std::env::var("OPENAI_API_KEY")
        .map(SecretString::from)
        .map_err(|_| {
            anyhow::anyhow!("OPENAI_API_KEY is not set; export it or add it to a .env file")
        })?;

    let client = build_client(&config.llm, api_key)?;

    if std::env::args().any(|arg| arg == "--check") {
        return match check_connection(&client, &config.llm.model).await {
            ProbeOutcome::Ok => {
                info!("✅ Connection check passed.");
                Ok(())
            }
            outcome => anyhow::bail!("connection check failed: {outcome:?}"),
        };
    }

    // An unreadable source document aborts before any model calls.
    let document = SourceDocument::load(Path::new(&config.document.path))?;

    if config.document.write_digest {
        match document.write_digest(Path::new(&config.document.digest_path)) {
            Ok(()) => info!(path = %config.document.digest_path, "Abstract and conclusion saved"),
            Err(e) => warn!(error = %e, "Digest write failed, continuing"),
        }
    }

    let synthesizer = ChunkedSynthesizer::new(
        client,
        SynthesizerConfig {
            model: config.llm.model.clone(),
            chunk_size: config.pipeline.chunk_size,
            inter_call_delay: Duration::from_secs(config.pipeline.inter_call_delay_secs),
            chunk_temperature: config.pipeline.chunk_temperature,
            merge_temperature: config.pipeline.merge_temperature,
        },
    );
    let driver = PipelineDriver::new(synthesizer, "Document Interpretation");
    let output_path = Path::new(&config.pipeline.output_path);

    let summary = driver
        .run(
            &document.content,
            &config.questions.interpretation,
            output_path,
            SectionStyle::Heading,
        )
        .await?;
    info!(
        answered = summary.answered,
        skipped = summary.skipped,
        duration_ms = summary.duration_ms,
        "Interpretation phase complete"
    );

    let summary = driver
        .run(
            &document.content,
            &config.questions.user,
            output_path,
            SectionStyle::QuestionAnswer,
        )
        .await?;
    info!(
        answered = summary.answered,
        skipped = summary.skipped,
        duration_ms = summary.duration_ms,
        "User Q&A phase complete"
    );

    info!(output = %config.pipeline.output_path, "✅ Paperlens run complete.");
    Ok(())
}
