//! Outcome of an annotation pass.

use tsuzumark_document::{MarkerId, TextRange};

use crate::annotator::ClearSummary;
use crate::{AnnotateError, EngineError, LintIssue, ResolveError};

/// What happened during one [`crate::Orchestrator::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Result of the clearing step that starts every pass.
    pub cleared: ClearSummary,
    /// One entry per visited paragraph, in document order.
    pub paragraphs: Vec<ParagraphReport>,
    /// Fatal error that stopped the pass early. Work flushed before it stays
    /// in the document.
    pub aborted: Option<AnnotateError>,
}

/// Outcome for one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphReport {
    pub index: usize,
    pub outcome: ParagraphOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphOutcome {
    /// The engine reported no issues.
    Clean,
    /// The engine reported issues; one entry per issue visited.
    Linted(Vec<IssueReport>),
    /// The engine failed for this paragraph.
    EngineFailure(EngineError),
}

/// Outcome for one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    pub issue: LintIssue,
    pub outcome: IssueOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The issue was highlighted and its message attached to `marker`.
    Annotated {
        range: TextRange,
        marker: MarkerId,
        /// True if the message joined a marker created by an earlier issue.
        accumulated: bool,
    },
    /// The issue's position could not be resolved; it was skipped.
    ResolutionFailure(ResolveError),
}

impl RunReport {
    /// Returns every issue in processing order.
    pub fn issues(&self) -> impl Iterator<Item = (usize, &IssueReport)> {
        self.paragraphs.iter().flat_map(|p| match &p.outcome {
            ParagraphOutcome::Linted(issues) => {
                issues.iter().map(|i| (p.index, i)).collect::<Vec<_>>()
            }
            _ => Vec::new(),
        })
    }

    /// Returns how many issues were annotated.
    pub fn annotated_count(&self) -> usize {
        self.issues()
            .filter(|(_, i)| matches!(i.outcome, IssueOutcome::Annotated { .. }))
            .count()
    }

    /// Returns the paragraphs the engine failed on.
    pub fn engine_failures(&self) -> Vec<(usize, &EngineError)> {
        self.paragraphs
            .iter()
            .filter_map(|p| match &p.outcome {
                ParagraphOutcome::EngineFailure(e) => Some((p.index, e)),
                _ => None,
            })
            .collect()
    }

    /// Returns the issues that could not be resolved.
    pub fn resolution_failures(&self) -> Vec<(usize, &LintIssue, &ResolveError)> {
        self.issues()
            .filter_map(|(paragraph, i)| match &i.outcome {
                IssueOutcome::ResolutionFailure(e) => Some((paragraph, &i.issue, e)),
                _ => None,
            })
            .collect()
    }

    /// Returns true if the pass visited every paragraph.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}
