//! Annotator configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsuzumark_document::{HighlightColor, MarkerRemoval, MarkerTag};

use crate::annotator::Annotator;
use crate::kernel::EngineOptions;
use crate::{AnnotateError, ContentKind};

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration file written by `tzmark init`.
pub const DEFAULT_CONFIG: &str = r#"{
  // Rule entries run in order; every issue carries its entry id.
  "rules": [
    {
      "id": "no-todo",
      "rule": "pattern",
      "options": {
        "patterns": ["TODO", "FIXME"],
        "message": "Resolve \"{match}\" before publishing"
      }
    }
  ],
  "highlight": "turquoise",
  "removal": "keep-content",
  "content_kind": "text"
}
"#;

/// Configuration for an annotation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Rule entries, in execution order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Color applied to annotated ranges.
    #[serde(default)]
    pub highlight: HighlightColor,

    /// Disposition of wrapped text when markers are cleared.
    #[serde(default)]
    pub removal: MarkerRemoval,

    /// Hint passed to the lint engine.
    #[serde(default)]
    pub content_kind: ContentKind,

    /// Directory for dictionary files. Relative paths are resolved against
    /// `base_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_dir: Option<PathBuf>,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// One `(id, rule, options)` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Unique id attached to every issue the entry reports.
    pub id: String,
    /// Rule implementation name, looked up in the rule registry.
    pub rule: String,
    #[serde(default)]
    pub options: serde_json::Value,
}

impl RuleConfig {
    pub fn new(id: impl Into<String>, rule: impl Into<String>, options: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            rule: rule.into(),
            options,
        }
    }
}

impl AnnotatorConfig {
    /// File names searched by [`AnnotatorConfig::discover`], in priority order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".tsuzumark.jsonc", ".tsuzumark.json"];

    /// Creates a configuration with no rules and default settings.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            highlight: HighlightColor::default(),
            removal: MarkerRemoval::default(),
            content_kind: ContentKind::default(),
            dictionary_dir: None,
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnnotateError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AnnotateError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from JSON (comments and trailing commas allowed)
    /// with schema validation.
    pub fn from_json(json: &str) -> Result<Self, AnnotateError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| AnnotateError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(AnnotateError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| AnnotateError::config(format!("Invalid config: {}", e)))
    }

    /// Finds the first configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Returns the engine construction settings.
    pub fn engine_options(&self) -> EngineOptions {
        let dictionary_dir = match (&self.dictionary_dir, &self.base_dir) {
            (Some(dir), Some(base)) if dir.is_relative() => Some(base.join(dir)),
            (Some(dir), _) => Some(dir.clone()),
            (None, base) => base.clone(),
        };
        EngineOptions { dictionary_dir }
    }

    /// Creates the annotator described by this configuration.
    pub fn annotator(&self) -> Annotator {
        Annotator::new(MarkerTag::LINT)
            .with_color(self.highlight)
            .with_removal(self.removal)
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
