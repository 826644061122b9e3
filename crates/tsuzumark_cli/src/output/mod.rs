//! Output formatting module

mod json;
mod text;

use std::path::Path;

use miette::Result;
use tsuzumark_core::{ClearSummary, RunReport};
use tsuzumark_document::Marker;

use crate::cli::OutputFormat;

/// Everything an `annotate` run prints.
pub struct AnnotateOutput<'a> {
    pub path: &'a Path,
    pub paragraphs: usize,
    pub report: &'a RunReport,
    /// Markers as left by the pass, before any `--clear`.
    pub markers: &'a [Marker],
    /// Set when `--clear` removed the annotations again.
    pub cleared: Option<ClearSummary>,
}

pub fn output_annotations(output: &AnnotateOutput<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(output)?,
        OutputFormat::Text => text::output_text(output),
    }
    Ok(())
}
