//! # tsuzumark_core
//!
//! Lint-to-document annotation pipeline for TsuzuMark.
//!
//! This crate provides:
//! - The `LintEngine` interface and `RuleKernel`, a configurable engine
//! - `RangeResolver`, mapping reported line/column positions to document ranges
//! - `Annotator`, applying and clearing highlights and tagged markers
//! - The `Orchestrator` driving a whole pass, with progress and a `RunReport`
//! - Configuration loading
//!
//! ## Example
//!
//! ```rust
//! use tsuzumark_core::{AnnotatorConfig, Orchestrator, RuleKernel, RuleRegistry};
//! use tsuzumark_document::MemoryDocument;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let config = AnnotatorConfig::from_json(
//!     r#"{ "rules": [{ "id": "no-todo", "rule": "pattern", "options": { "patterns": ["TODO"] } }] }"#,
//! )?;
//! let kernel = RuleKernel::from_config(&config, &RuleRegistry::builtin()).unwrap();
//!
//! let doc = MemoryDocument::from_plain_text("Fix this TODO later.");
//! let orchestrator = Orchestrator::new(doc.clone(), kernel).with_annotator(config.annotator());
//! let report = orchestrator.run().await?;
//!
//! assert_eq!(report.annotated_count(), 1);
//! assert_eq!(doc.markers()[0].title, "Found \"TODO\";");
//! # Ok::<(), tsuzumark_core::AnnotateError>(())
//! # }).unwrap();
//! ```

pub mod annotator;
mod config;
mod engine;
mod error;
pub mod kernel;
mod orchestrator;
mod paragraphs;
pub mod progress;
mod report;
pub mod resolver;
pub mod rules;

pub use annotator::{Annotation, Annotator, ClearSummary};
pub use config::{AnnotatorConfig, DEFAULT_CONFIG, RuleConfig};
pub use engine::{ContentKind, LintEngine, LintIssue, LintOutput};
pub use error::{AnnotateError, EngineError, ResolveError};
pub use kernel::{EngineOptions, Rule, RuleEntry, RuleError, RuleKernel, RuleReport};
pub use orchestrator::{Orchestrator, OrchestratorState};
pub use paragraphs::ParagraphIterator;
pub use progress::{NoopProgress, Progress, ProgressSink, TracingProgress};
pub use report::{IssueOutcome, IssueReport, ParagraphOutcome, ParagraphReport, RunReport};
pub use resolver::RangeResolver;
pub use rules::RuleRegistry;
