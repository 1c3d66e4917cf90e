//! paperlens-pipeline — Chunked question answering over one document.
//! - Resumption ledger recovered from previously written output
//! - Per-chunk answering with a second-pass synthesis merge
//! - Driver that persists one Markdown section per question

pub mod driver;
pub mod ledger;
pub mod prompts;
pub mod synthesizer;

pub use driver::{PipelineDriver, RunSummary, SectionStyle};
pub use synthesizer::{ChunkedSynthesizer, SynthesizerConfig};
