//! Lint engine interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Hint describing how the engine should read the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Plain text (`.txt`).
    #[default]
    Text,
    /// Markdown (`.md`).
    Markdown,
}

impl ContentKind {
    /// Returns the file extension associated with this kind.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Text => ".txt",
            Self::Markdown => ".md",
        }
    }
}

/// One problem reported by the engine.
///
/// `line` is 1-based and counts soft line breaks inside the paragraph text;
/// `column` is 1-based and counts characters from the start of that line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LintIssue {
    /// Id of the rule entry that reported the issue.
    pub rule_id: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl LintIssue {
    /// Creates a new issue.
    pub fn new(
        rule_id: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Result of linting one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintOutput {
    /// Issues in ascending `(line, column)` order.
    pub messages: Vec<LintIssue>,
}

impl LintOutput {
    /// Creates an output from issues already in order.
    pub fn new(messages: Vec<LintIssue>) -> Self {
        Self { messages }
    }
}

/// A text linter.
///
/// Implementations must be deterministic for a given text and fixed
/// configuration. An error is scoped to the single call that produced it.
#[async_trait]
pub trait LintEngine: Send + Sync {
    /// Lints one paragraph's plain text.
    async fn lint(&self, text: &str, kind: ContentKind) -> Result<LintOutput, EngineError>;
}

#[async_trait]
impl<E: LintEngine + ?Sized> LintEngine for std::sync::Arc<E> {
    async fn lint(&self, text: &str, kind: ContentKind) -> Result<LintOutput, EngineError> {
        (**self).lint(text, kind).await
    }
}
