//! Rules command implementation

use miette::{IntoDiagnostic, Result};
use tsuzumark_core::{RuleKernel, RuleRegistry};

use super::load_config;
use crate::cli::Cli;

/// Prints the configured rule entries in execution order.
///
/// Every entry is built first, so a bad rule name or bad options fail the
/// command the same way they would fail `annotate`.
pub fn run_rules(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let registry = RuleRegistry::builtin();
    RuleKernel::from_config(&config, &registry).into_diagnostic()?;

    if config.rules.is_empty() {
        println!("No rules configured");
    } else {
        println!("Configured rules:");
        let width = config.rules.iter().map(|r| r.id.len()).max().unwrap_or(0);
        for rule in &config.rules {
            println!("  {:<width$}  {}", rule.id, rule.rule, width = width);
        }
    }

    println!();
    println!(
        "Available implementations: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
