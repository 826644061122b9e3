//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use serde_json::json;
use tsuzumark_core::IssueOutcome;

use super::AnnotateOutput;

pub fn output_json(output: &AnnotateOutput<'_>) -> Result<()> {
    let report = output.report;

    let issues: Vec<_> = report
        .issues()
        .map(|(paragraph, issue)| {
            let mut value = json!({
                "paragraph": paragraph,
                "rule_id": issue.issue.rule_id,
                "line": issue.issue.line,
                "column": issue.issue.column,
                "message": issue.issue.message,
            });
            match &issue.outcome {
                IssueOutcome::Annotated {
                    range,
                    marker,
                    accumulated,
                } => {
                    value["range"] = json!(range);
                    value["marker"] = json!(marker);
                    value["accumulated"] = json!(accumulated);
                }
                IssueOutcome::ResolutionFailure(e) => {
                    value["error"] = json!(e.to_string());
                }
            }
            value
        })
        .collect();

    let engine_failures: Vec<_> = report
        .engine_failures()
        .into_iter()
        .map(|(paragraph, e)| json!({ "paragraph": paragraph, "error": e.to_string() }))
        .collect();

    let value = json!({
        "path": output.path.display().to_string(),
        "paragraphs": output.paragraphs,
        "markers": output.markers,
        "issues": issues,
        "engine_failures": engine_failures,
        "aborted": report.aborted.as_ref().map(|e| e.to_string()),
        "cleared": output.cleared,
    });
    println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
    Ok(())
}
