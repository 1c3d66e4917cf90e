//! Markdown document loading.
//!
//! Reads the source file once at startup and derives the optional
//! abstract and conclusion sections by keyword scan. The document is
//! held read-only for the whole run.

use std::path::Path;

use tracing::{debug, info, warn};

use paperlens_common::Result;

/// Keywords that introduce the abstract section, checked in order.
const ABSTRACT_KEYWORDS: &[&str] = &["摘要", "Abstract"];
/// Keywords that introduce the conclusion section, checked in order.
const CONCLUSION_KEYWORDS: &[&str] = &["结论", "Conclusion"];

/// An immutable source document plus derived sections.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub content: String,
    pub abstract_text: Option<String>,
    pub conclusion: Option<String>,
}

impl SourceDocument {
    /// Read a UTF-8 Markdown file and extract abstract/conclusion.
    /// A read failure is fatal: no model calls make sense without input.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc = Self::from_content(content);
        info!(
            path = %path.display(),
            chars = doc.content.chars().count(),
            has_abstract = doc.abstract_text.is_some(),
            has_conclusion = doc.conclusion.is_some(),
            "Source document loaded"
        );
        Ok(doc)
    }

    pub fn from_content(content: String) -> Self {
        let abstract_text = extract_section(&content, ABSTRACT_KEYWORDS);
        let conclusion = extract_section(&content, CONCLUSION_KEYWORDS);
        Self {
            content,
            abstract_text,
            conclusion,
        }
    }

    /// Write a small digest file with the extracted abstract and
    /// conclusion. Best-effort: callers treat a failure as non-fatal.
    pub fn write_digest(&self, path: &Path) -> Result<()> {
        let mut out = String::from("# Abstract & Conclusion\n\n");
        if let Some(ref text) = self.abstract_text {
            out.push_str("## Abstract\n\n");
            out.push_str(text);
            out.push_str("\n\n");
        }
        if let Some(ref text) = self.conclusion {
            out.push_str("## Conclusion\n\n");
            out.push_str(text);
            out.push_str("\n\n");
        }
        std::fs::write(path, out)?;
        debug!(path = %path.display(), "Digest written");
        Ok(())
    }
}

/// Find the first matching keyword and return the text between it and
/// the next Markdown heading (a line starting with `#`), trimmed.
fn extract_section(content: &str, keywords: &[&str]) -> Option<String> {
    for keyword in keywords {
        if let Some(pos) = content.find(keyword) {
            let start = pos + keyword.len();
            let rest = &content[start..];
            let section = match rest.find("\n#") {
                Some(end) => &rest[..end],
                None => rest,
            };
            let section = section.trim();
            if section.is_empty() {
                warn!(keyword, "Section keyword found but section is empty");
                return None;
            }
            return Some(section.to_string());
        }
    }
    None
}
