//! Text output formatter

use tsuzumark_core::{IssueOutcome, ParagraphOutcome};

use super::AnnotateOutput;

/// Prints one line per issue as `paragraph:line:column`, with 1-based
/// paragraph numbers.
pub fn output_text(output: &AnnotateOutput<'_>) {
    let report = output.report;

    if !report.paragraphs.is_empty() {
        println!("\n{}:", output.path.display());
    }
    for paragraph in &report.paragraphs {
        let number = paragraph.index + 1;
        match &paragraph.outcome {
            ParagraphOutcome::Clean => {}
            ParagraphOutcome::EngineFailure(e) => {
                println!("  {}: engine failure: {}", number, e);
            }
            ParagraphOutcome::Linted(issues) => {
                for report in issues {
                    let issue = &report.issue;
                    match &report.outcome {
                        IssueOutcome::Annotated { marker, .. } => println!(
                            "  {}:{}:{} [{}]: {} ({})",
                            number, issue.line, issue.column, issue.rule_id, issue.message, marker
                        ),
                        IssueOutcome::ResolutionFailure(e) => println!(
                            "  {}:{}:{} [{}]: {} (skipped: {})",
                            number, issue.line, issue.column, issue.rule_id, issue.message, e
                        ),
                    }
                }
            }
        }
    }

    println!();
    println!(
        "Annotated {} issues with {} markers in {} paragraphs",
        report.annotated_count(),
        output.markers.len(),
        output.paragraphs
    );

    if let Some(cleared) = output.cleared {
        println!("Removed {} markers", cleared.markers_removed);
    }
}
