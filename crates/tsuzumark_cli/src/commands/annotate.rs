//! Annotate command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};
use tsuzumark_core::{Orchestrator, RuleKernel, RuleRegistry, TracingProgress};
use tsuzumark_document::MemoryDocument;

use super::load_config;
use crate::cli::{Cli, OutputFormat};
use crate::output::{AnnotateOutput, output_annotations};

pub fn run_annotate(cli: &Cli, file: &Path, format: OutputFormat, clear: bool) -> Result<bool> {
    let config = load_config(cli)?;
    let kernel = RuleKernel::from_config(&config, &RuleRegistry::builtin()).into_diagnostic()?;
    if kernel.rule_ids().next().is_none() {
        warn!("No rules configured; nothing will be annotated");
    }

    let text = std::fs::read_to_string(file)
        .map_err(|e| miette::miette!("Failed to read {}: {}", file.display(), e))?;
    let document = MemoryDocument::from_plain_text(&text);
    info!(
        "Annotating {} ({} paragraphs)",
        file.display(),
        document.paragraph_count()
    );

    let orchestrator = Orchestrator::new(document.clone(), kernel)
        .with_annotator(config.annotator())
        .with_content_kind(config.content_kind)
        .with_progress(TracingProgress);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let report = runtime.block_on(orchestrator.run()).into_diagnostic()?;
    let markers = document.markers();

    let cleared = if clear {
        Some(runtime.block_on(orchestrator.clear()).into_diagnostic()?)
    } else {
        None
    };

    output_annotations(
        &AnnotateOutput {
            path: file,
            paragraphs: document.paragraph_count(),
            report: &report,
            markers: &markers,
            cleared,
        },
        format,
    )?;

    if let Some(e) = report.aborted {
        return Err(miette::miette!("Annotation aborted: {}", e));
    }

    Ok(!markers.is_empty())
}
