//! Uploaded document attachments.

use std::fmt;

/// An uploaded file, held in memory for the duration of one analysis.
///
/// Attachments are forwarded verbatim to the workflow producer and run
/// through text extraction for the LLM producer; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    /// Original file name as uploaded.
    pub file_name: String,
    /// MIME content type declared by the client.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    /// Creates an attachment from upload parts.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Returns the size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the attachment has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the lowercase extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

impl fmt::Display for AttachedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} bytes)",
            self.file_name,
            self.content_type,
            self.bytes.len()
        )
    }
}
