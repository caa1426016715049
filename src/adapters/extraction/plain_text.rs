//! Plain-text extraction for textual attachment formats.
//!
//! Handles the textual formats users actually upload here: plain text,
//! markdown, CSV, and JSON. Binary document formats are rejected with a
//! typed error naming the format, which the handlers surface as a setup
//! failure before any producer launches.

use crate::domain::analysis::AttachedFile;
use crate::ports::{ExtractionError, TextExtractor};

/// Content types decoded as UTF-8 text.
const TEXT_CONTENT_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/csv",
    "application/json",
];

/// Extensions decoded as UTF-8 text when the content type is generic.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "csv", "json"];

/// Extractor for textual attachment formats.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    fn is_textual(file: &AttachedFile) -> bool {
        let content_type = file
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if TEXT_CONTENT_TYPES.contains(&content_type.as_str()) {
            return true;
        }
        // Browsers often send octet-stream for text files; fall back to
        // the extension.
        if content_type.is_empty() || content_type == "application/octet-stream" {
            return file
                .extension()
                .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()));
        }
        false
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, file: &AttachedFile) -> Result<String, ExtractionError> {
        if !Self::is_textual(file) {
            return Err(ExtractionError::unsupported(file.content_type.clone()));
        }

        String::from_utf8(file.bytes.clone())
            .map_err(|e| ExtractionError::undecodable(e.to_string()))
    }
}
