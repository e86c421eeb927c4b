//! Text extraction from source files.
//!
//! The outline parser only consumes plain text. Decoding files into text is
//! the job of an [`Extractor`]; the built-in one handles plain text and
//! markdown and leaves binary document formats to external implementations.

use async_trait::async_trait;
use opsbot_core::{AppError, AppResult};
use std::path::Path;

/// Document format classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Pdf,
    Docx,
    Unknown,
}

impl DocumentFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("txt") | Some("text") => Self::PlainText,
            Some("md") | Some("markdown") => Self::Markdown,
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            _ => Self::Unknown,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Unknown => "unknown",
        }
    }
}

/// Produces plain text for a source file.
#[async_trait]
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Get extractor name
    fn name(&self) -> &str;

    /// Whether this extractor can decode the format.
    fn supports(&self, format: DocumentFormat) -> bool;

    /// Read `path` and return its text.
    ///
    /// Fails with `UnsupportedFormat` for formats this extractor does not
    /// handle and with `Extraction` when a supported file cannot be decoded.
    async fn extract(&self, path: &Path) -> AppResult<String>;
}

/// Extractor for UTF-8 plain text and markdown files.
///
/// Markdown is passed through untouched: heading markup is meaningful to the
/// outline parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

#[async_trait]
impl Extractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::PlainText | DocumentFormat::Markdown)
    }

    async fn extract(&self, path: &Path) -> AppResult<String> {
        let format = DocumentFormat::from_path(path);
        if !self.supports(format) {
            return Err(AppError::UnsupportedFormat(format!(
                "{:?} ({} files need an external extractor)",
                path,
                format.as_str()
            )));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to read {:?}: {}", path, e)))?;

        let text = String::from_utf8(bytes)
            .map_err(|e| AppError::Extraction(format!("{:?} is not valid UTF-8: {}", path, e)))?;

        if !is_likely_text(&text) {
            return Err(AppError::Extraction(format!(
                "{:?} looks like a binary file",
                path
            )));
        }

        Ok(text)
    }
}

/// Check if text is likely text (not binary).
fn is_likely_text(data: &str) -> bool {
    !data.contains('\0')
}
