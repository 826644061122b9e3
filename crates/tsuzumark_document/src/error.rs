//! Document error types.

use thiserror::Error;

use crate::MarkerId;

/// Errors reported by a document host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document handle cannot be read at all.
    #[error("Document unavailable: {0}")]
    Unavailable(String),

    /// Flushing queued writes to the document failed.
    #[error("Sync failed: {0}")]
    Sync(String),

    /// A range does not fit inside its paragraph.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// No paragraph exists at the given index.
    #[error("Paragraph not found: {0}")]
    UnknownParagraph(usize),

    /// No marker exists with the given id.
    #[error("Marker not found: {0}")]
    UnknownMarker(MarkerId),
}

impl DocumentError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a sync error.
    pub fn sync(message: impl Into<String>) -> Self {
        Self::Sync(message.into())
    }

    /// Creates an invalid range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange(message.into())
    }

    /// Returns true if this error must abort a whole annotation pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Sync(_))
    }
}
