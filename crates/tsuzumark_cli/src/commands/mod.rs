//! Command implementations

pub mod annotate;
pub mod init;
pub mod rules;

use miette::{IntoDiagnostic, Result};
use tracing::info;
use tsuzumark_core::AnnotatorConfig;

use crate::cli::Cli;

/// Loads the `--config` file, or the first config file in the working
/// directory, or defaults.
pub fn load_config(cli: &Cli) -> Result<AnnotatorConfig> {
    if let Some(ref path) = cli.config {
        return AnnotatorConfig::from_file(path).into_diagnostic();
    }

    if let Some(path) = AnnotatorConfig::discover(".") {
        info!("Using config: {}", path.display());
        return AnnotatorConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(AnnotatorConfig::new())
}
