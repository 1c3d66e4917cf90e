//! Configuration loading for Paperlens.
//! Reads paperlens.toml from the current directory or the path in the
//! PAPERLENS_CONFIG env var. The API credential is never stored here;
//! it comes from the environment at startup.

use paperlens_common::PaperlensError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub document: DocumentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub questions: QuestionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the UTF-8 Markdown source document.
    pub path: String,
    #[serde(default = "default_digest_path")]
    pub digest_path: String,
    #[serde(default = "bool_true")]
    pub write_digest: bool,
}

fn default_digest_path() -> String { "abstract_conclusion.md".to_string() }
fn bool_true()           -> bool   { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
    /// Per-1k-token rates for cost logging; omit to skip estimates.
    pub pricing: Option<PricingConfig>,
}

fn default_endpoint()        -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model()           -> String { "gpt-4-turbo-preview".to_string() }
fn default_timeout_secs()    -> u64    { 30 }
fn default_max_retries()     -> u32    { 4 }
fn default_base_delay_secs() -> u64    { 2 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            request_timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay_secs(),
            pricing: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_inter_call_delay_secs")]
    pub inter_call_delay_secs: u64,
    #[serde(default = "default_chunk_temperature")]
    pub chunk_temperature: f32,
    #[serde(default = "default_merge_temperature")]
    pub merge_temperature: f32,
}

fn default_output_path()          -> String { "interpretation_results.md".to_string() }
fn default_chunk_size()           -> usize  { 12_000 }
fn default_inter_call_delay_secs() -> u64   { 1 }
fn default_chunk_temperature()    -> f32    { 0.7 }
fn default_merge_temperature()    -> f32    { 0.1 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            chunk_size: default_chunk_size(),
            inter_call_delay_secs: default_inter_call_delay_secs(),
            chunk_temperature: default_chunk_temperature(),
            merge_temperature: default_merge_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuestionsConfig {
    /// Fixed interpretation questions, written as `## <question>`.
    #[serde(default)]
    pub interpretation: Vec<String>,
    /// User questions, written as `## Q: <question>` / `A: <answer>`.
    #[serde(default)]
    pub user: Vec<String>,
}


impl Config {
    /// Load configuration from paperlens.toml.
    /// Checks PAPERLENS_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("PAPERLENS_CONFIG")
            .unwrap_or_else(|_| "paperlens.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy paperlens.example.toml to paperlens.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values deserialization alone cannot catch. Runs before
    /// any pipeline work so a bad config is fatal up front, not a
    /// mid-run surprise.
    pub fn validate(&self) -> paperlens_common::Result<()> {
        if self.pipeline.chunk_size == 0 {
            return Err(PaperlensError::Config(
                "pipeline.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.document.path.trim().is_empty() {
            return Err(PaperlensError::Config(
                "document.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
