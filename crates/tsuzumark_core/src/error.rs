//! Error types for the annotation pipeline.

use thiserror::Error;
use tsuzumark_document::DocumentError;

/// Errors that abort an annotation pass or prevent it from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotateError {
    /// The document cannot be read at all.
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),

    /// Flushing writes to the document failed.
    #[error("Sync failed: {0}")]
    Sync(String),

    /// Any other document error.
    #[error("Document error: {0}")]
    Document(DocumentError),

    /// A pass is already running on this orchestrator.
    #[error("An annotation pass is already in progress")]
    Busy,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnnotateError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<DocumentError> for AnnotateError {
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::Unavailable(message) => Self::DocumentUnavailable(message),
            DocumentError::Sync(message) => Self::Sync(message),
            other => Self::Document(other),
        }
    }
}

/// A lint engine call failed for one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A rule returned an error.
    #[error("Rule '{rule_id}' failed: {message}")]
    Rule { rule_id: String, message: String },

    /// A rule panicked.
    #[error("Rule '{rule_id}' panicked: {message}")]
    Panicked { rule_id: String, message: String },

    /// The engine could not be built from its configuration.
    #[error("Engine configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Creates a rule error.
    pub fn rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// A reported line/column could not be mapped to a document range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Line and column are 1-based; zero is never valid.
    #[error("Invalid position {line}:{column}")]
    InvalidPosition { line: u32, column: u32 },

    /// The paragraph has fewer lines than reported.
    #[error("Line {line} is out of range (paragraph has {lines} lines)")]
    LineOutOfRange { line: u32, lines: usize },

    /// The line is shorter than the reported column.
    #[error("Column {column} is out of range on line {line} (length {len})")]
    ColumnOutOfRange { line: u32, column: u32, len: usize },

    /// The host failed while resolving.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ResolveError {
    /// Returns true if the failure must abort the whole pass rather than
    /// skip one issue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Document(e) if e.is_fatal())
    }
}
