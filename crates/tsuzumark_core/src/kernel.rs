//! Rule kernel.
//!
//! The kernel is a [`LintEngine`] built from an ordered list of
//! `(id, rule, options)` entries. Entry order decides execution order only;
//! the combined output is sorted by position.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use tsuzumark_document::LINE_BREAK;

use crate::config::AnnotatorConfig;
use crate::rules::RuleRegistry;
use crate::{ContentKind, EngineError, LintEngine, LintIssue, LintOutput};

/// Error returned by a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A problem found by a rule, positioned by character index into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    /// Character (not byte) offset from the start of the text.
    pub index: usize,
    pub message: String,
}

impl RuleReport {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

/// A lint rule.
pub trait Rule: Send + Sync {
    /// Checks `text` and reports every problem found.
    fn lint(&self, text: &str, kind: ContentKind) -> Result<Vec<RuleReport>, RuleError>;
}

/// Construction-time settings shared by every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Directory that relative dictionary paths are resolved against.
    pub dictionary_dir: Option<PathBuf>,
}

impl EngineOptions {
    /// Resolves a dictionary file name.
    pub fn resolve_dictionary(&self, name: impl AsRef<Path>) -> PathBuf {
        let name = name.as_ref();
        match &self.dictionary_dir {
            Some(dir) if name.is_relative() => dir.join(name),
            _ => name.to_path_buf(),
        }
    }
}

/// A configured rule.
pub struct RuleEntry {
    pub id: String,
    pub rule: Box<dyn Rule>,
    pub options: serde_json::Value,
}

impl RuleEntry {
    pub fn new(id: impl Into<String>, rule: Box<dyn Rule>, options: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            rule,
            options,
        }
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("id", &self.id)
            .field("rule", &"<dyn Rule>")
            .field("options", &self.options)
            .finish()
    }
}

/// Runs configured rules and merges their reports.
#[derive(Debug, Default)]
pub struct RuleKernel {
    entries: Vec<RuleEntry>,
    options: EngineOptions,
}

impl RuleKernel {
    /// Creates a kernel from entries, in execution order.
    pub fn new(entries: Vec<RuleEntry>, options: EngineOptions) -> Self {
        Self { entries, options }
    }

    /// Builds a kernel from configuration, creating each rule through the
    /// registry.
    pub fn from_config(
        config: &AnnotatorConfig,
        registry: &RuleRegistry,
    ) -> Result<Self, EngineError> {
        let options = config.engine_options();
        let mut entries = Vec::with_capacity(config.rules.len());

        for rule in &config.rules {
            if entries.iter().any(|e: &RuleEntry| e.id == rule.id) {
                return Err(EngineError::config(format!(
                    "Duplicate rule id '{}'",
                    rule.id
                )));
            }
            debug!("Creating rule '{}' ({})", rule.id, rule.rule);
            let created = registry.create(&rule.rule, &rule.options, &options)?;
            entries.push(RuleEntry::new(&rule.id, created, rule.options.clone()));
        }

        Ok(Self::new(entries, options))
    }

    /// Returns the configured rule ids, in execution order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Returns the engine options the rules were built with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Lints text synchronously.
    pub fn lint_text(&self, text: &str, kind: ContentKind) -> Result<LintOutput, EngineError> {
        let lines = LineIndex::new(text);
        let mut messages = Vec::new();

        for entry in &self.entries {
            let reports = catch_unwind(AssertUnwindSafe(|| entry.rule.lint(text, kind)))
                .map_err(|payload| {
                    let message = panic_message(payload.as_ref());
                    warn!("Rule '{}' panicked: {}", entry.id, message);
                    EngineError::Panicked {
                        rule_id: entry.id.clone(),
                        message,
                    }
                })?
                .map_err(|e| {
                    warn!("Rule '{}' failed: {}", entry.id, e);
                    EngineError::rule(&entry.id, e.0)
                })?;

            messages.extend(reports.into_iter().map(|report| {
                let (line, column) = lines.position(report.index);
                LintIssue::new(&entry.id, line, column, report.message)
            }));
        }

        // Stable: equal positions keep rule execution order.
        messages.sort_by_key(|m| (m.line, m.column));
        Ok(LintOutput::new(messages))
    }
}

#[async_trait]
impl LintEngine for RuleKernel {
    async fn lint(&self, text: &str, kind: ContentKind) -> Result<LintOutput, EngineError> {
        self.lint_text(text, kind)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Maps character offsets to 1-based line/column pairs.
struct LineIndex {
    /// Character offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, c) in text.chars().enumerate() {
            if c == LINE_BREAK {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    fn position(&self, index: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= index);
        let column = index - self.line_starts[line - 1] + 1;
        (line as u32, column as u32)
    }
}
