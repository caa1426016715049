//! Text Extractor Port - Attachment-to-plain-text conversion.

use crate::domain::analysis::AttachedFile;

/// Port for extracting plain text from an uploaded document.
///
/// # Contract
///
/// Implementations must:
/// - Return the complete extractable text for supported formats
/// - Return `ExtractionError::UnsupportedFormat` for formats they cannot
///   handle, naming the format
/// - Never panic on malformed input
pub trait TextExtractor: Send + Sync {
    /// Extracts plain text from the attachment.
    fn extract(&self, file: &AttachedFile) -> Result<String, ExtractionError>;
}

/// Text extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The format is not supported by this extractor.
    #[error("unsupported attachment format: {format}")]
    UnsupportedFormat {
        /// The offending content type or extension.
        format: String,
    },

    /// The content could not be decoded.
    #[error("attachment could not be decoded: {reason}")]
    Undecodable {
        /// What went wrong.
        reason: String,
    },
}

impl ExtractionError {
    /// Creates an unsupported format error.
    pub fn unsupported(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an undecodable content error.
    pub fn undecodable(reason: impl Into<String>) -> Self {
        Self::Undecodable {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn TextExtractor) {}

    #[test]
    fn errors_display_with_context() {
        assert_eq!(
            ExtractionError::unsupported("application/pdf").to_string(),
            "unsupported attachment format: application/pdf"
        );
        assert_eq!(
            ExtractionError::undecodable("invalid utf-8").to_string(),
            "attachment could not be decoded: invalid utf-8"
        );
    }
}
