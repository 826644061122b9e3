//! pattern rule: report every match of configured patterns.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | patterns | string[] | [] | Regular expressions to report |
//! | dictionary | string | - | File of literal terms, one per line (`#` starts a comment) |
//! | message | string | `Found "{match}"` | Message template; `{match}` is replaced with the matched text |
//!
//! # Example
//!
//! ```json
//! {
//!   "id": "no-todo",
//!   "rule": "pattern",
//!   "options": { "patterns": ["TODO", "FIXME"], "message": "Resolve \"{match}\"" }
//! }
//! ```

use std::fs;

use regex::Regex;
use serde::Deserialize;

use crate::kernel::{EngineOptions, Rule, RuleError, RuleReport};
use crate::{ContentKind, EngineError};

const DEFAULT_MESSAGE: &str = "Found \"{match}\"";

/// Options accepted by [`PatternRule`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternOptions {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub dictionary: Option<String>,
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

/// Reports every non-empty, non-overlapping match of a set of patterns.
#[derive(Debug)]
pub struct PatternRule {
    regex: Regex,
    message: String,
}

impl PatternRule {
    /// Name used in configuration.
    pub const NAME: &'static str = "pattern";

    /// Builds the rule from configuration options.
    pub fn from_options(
        options: &serde_json::Value,
        engine: &EngineOptions,
    ) -> Result<Self, EngineError> {
        let options: PatternOptions = serde_json::from_value(options.clone())
            .map_err(|e| EngineError::config(format!("Invalid pattern options: {}", e)))?;

        let mut alternatives = options.patterns.clone();
        if let Some(dictionary) = &options.dictionary {
            let path = engine.resolve_dictionary(dictionary);
            let content = fs::read_to_string(&path).map_err(|e| {
                EngineError::config(format!(
                    "Failed to read dictionary {}: {}",
                    path.display(),
                    e
                ))
            })?;
            alternatives.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(regex::escape),
            );
        }

        Self::new(&alternatives, options.message)
    }

    /// Builds the rule from regular expressions.
    pub fn new(patterns: &[String], message: impl Into<String>) -> Result<Self, EngineError> {
        if patterns.is_empty() {
            return Err(EngineError::config(
                "pattern rule needs at least one pattern or dictionary term",
            ));
        }
        let joined = patterns
            .iter()
            .map(|p| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&joined)
            .map_err(|e| EngineError::config(format!("Invalid pattern: {}", e)))?;

        Ok(Self {
            regex,
            message: message.into(),
        })
    }
}

impl Rule for PatternRule {
    fn lint(&self, text: &str, _kind: ContentKind) -> Result<Vec<RuleReport>, RuleError> {
        let mut reports = Vec::new();
        // Byte offset and char count of the previous match start.
        let mut last_byte = 0;
        let mut last_char = 0;

        for m in self.regex.find_iter(text) {
            if m.is_empty() {
                continue;
            }
            last_char += text[last_byte..m.start()].chars().count();
            last_byte = m.start();
            reports.push(RuleReport::new(
                last_char,
                self.message.replace("{match}", m.as_str()),
            ));
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    fn indices(rule: &PatternRule, text: &str) -> Vec<(usize, String)> {
        rule.lint(text, ContentKind::Text)
            .unwrap()
            .into_iter()
            .map(|r| (r.index, r.message))
            .collect()
    }

    #[test]
    fn test_reports_char_indices() {
        let rule = PatternRule::new(&["A".to_string()], "{match}!").unwrap();
        assert_eq!(
            indices(&rule, "AのAがBも"),
            vec![(0, "A!".to_string()), (2, "A!".to_string())]
        );
    }

    #[test]
    fn test_multiple_patterns() {
        let rule = PatternRule::new(&["TODO".to_string(), "FIXME".to_string()], DEFAULT_MESSAGE)
            .unwrap();
        assert_eq!(
            indices(&rule, "FIXME: 直す TODO"),
            vec![
                (0, "Found \"FIXME\"".to_string()),
                (10, "Found \"TODO\"".to_string())
            ]
        );
    }

    #[test]
    fn test_no_patterns_is_config_error() {
        let err = PatternRule::new(&[], DEFAULT_MESSAGE).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let err = PatternRule::new(&["(".to_string()], DEFAULT_MESSAGE).unwrap_err();
        assert!(err.to_string().contains("Invalid pattern"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = PatternRule::from_options(
            &json!({ "patterns": ["a"], "severity": "error" }),
            &EngineOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid pattern options"));
    }

    #[test]
    fn test_dictionary_resolved_against_dictionary_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("terms.txt")).unwrap();
        writeln!(file, "# synonyms").unwrap();
        writeln!(file, "a.b").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "ユーザ").unwrap();

        let engine = EngineOptions {
            dictionary_dir: Some(dir.path().to_path_buf()),
        };
        let rule = PatternRule::from_options(
            &json!({ "dictionary": "terms.txt", "message": "{match}" }),
            &engine,
        )
        .unwrap();

        // Dictionary terms are literals: "a.b" must not match "axb".
        assert_eq!(
            indices(&rule, "axb a.b ユーザー"),
            vec![(4, "a.b".to_string()), (8, "ユーザ".to_string())]
        );
    }

    #[test]
    fn test_missing_dictionary_is_config_error() {
        let err = PatternRule::from_options(
            &json!({ "dictionary": "/nonexistent/terms.txt" }),
            &EngineOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read dictionary"));
    }
}
