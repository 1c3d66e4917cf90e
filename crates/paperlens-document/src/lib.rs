//! paperlens-document — Source document handling.
//! - Markdown loading with abstract/conclusion extraction
//! - Fixed-size chunking for oversized documents

pub mod chunker;
pub mod loader;

pub use chunker::{split, Chunk};
pub use loader::SourceDocument;
