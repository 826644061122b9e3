//! Sequential annotation pass.
//!
//! A pass clears earlier annotations, then visits paragraphs in document
//! order. Each paragraph is linted, and each reported issue is resolved and
//! annotated before the next one starts, so every unit observes the
//! document as left by the previous unit's `sync`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use tsuzumark_document::{DocumentHost, Paragraph};

use crate::annotator::{Annotator, ClearSummary};
use crate::paragraphs::ParagraphIterator;
use crate::progress::{NoopProgress, Progress, ProgressSink};
use crate::report::{IssueOutcome, IssueReport, ParagraphOutcome, ParagraphReport, RunReport};
use crate::resolver::RangeResolver;
use crate::{AnnotateError, ContentKind, LintEngine, LintIssue, ResolveError};

/// What an orchestrator is doing right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrchestratorState {
    #[default]
    Idle,
    Clearing,
    Linting {
        paragraph: usize,
    },
    Annotating {
        paragraph: usize,
        issue: usize,
    },
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Clearing => f.write_str("clearing"),
            Self::Linting { paragraph } => write!(f, "linting paragraph {}", paragraph),
            Self::Annotating { paragraph, issue } => {
                write!(f, "annotating issue {} of paragraph {}", issue, paragraph)
            }
        }
    }
}

/// Drives annotation passes over one document.
///
/// Only one pass runs at a time; a `run` or `clear` started while another is
/// in flight fails with [`AnnotateError::Busy`].
pub struct Orchestrator<H, E> {
    host: H,
    engine: E,
    resolver: RangeResolver,
    annotator: Annotator,
    progress: Arc<dyn ProgressSink>,
    content_kind: ContentKind,
    state: Mutex<OrchestratorState>,
}

impl<H, E> fmt::Debug for Orchestrator<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("resolver", &self.resolver)
            .field("annotator", &self.annotator)
            .field("content_kind", &self.content_kind)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

/// Marks a pass as running and returns the orchestrator to idle when
/// dropped, whichever way the pass ends.
struct PassGuard<'a> {
    state: &'a Mutex<OrchestratorState>,
    progress: &'a dyn ProgressSink,
}

impl<'a> PassGuard<'a> {
    fn begin(
        state: &'a Mutex<OrchestratorState>,
        progress: &'a dyn ProgressSink,
    ) -> Result<Self, AnnotateError> {
        let mut current = state.lock();
        if *current != OrchestratorState::Idle {
            debug!("Rejected pass while {}", *current);
            return Err(AnnotateError::Busy);
        }
        *current = OrchestratorState::Clearing;
        Ok(Self { state, progress })
    }

    fn set(&self, next: OrchestratorState) {
        *self.state.lock() = next;
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = OrchestratorState::Idle;
        self.progress.hide();
    }
}

impl<H: DocumentHost, E: LintEngine> Orchestrator<H, E> {
    /// Creates an orchestrator with the default annotator and no progress
    /// output.
    pub fn new(host: H, engine: E) -> Self {
        Self {
            host,
            engine,
            resolver: RangeResolver::default(),
            annotator: Annotator::default(),
            progress: Arc::new(NoopProgress),
            content_kind: ContentKind::default(),
            state: Mutex::new(OrchestratorState::Idle),
        }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    pub fn with_content_kind(mut self, content_kind: ContentKind) -> Self {
        self.content_kind = content_kind;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Returns the current state.
    pub fn state(&self) -> OrchestratorState {
        *self.state.lock()
    }

    /// Removes every annotation this orchestrator's annotator created.
    pub async fn clear(&self) -> Result<ClearSummary, AnnotateError> {
        let _guard = PassGuard::begin(&self.state, self.progress.as_ref())?;
        let summary = self.annotator.clear_all(&self.host).await?;
        info!("Removed {} markers", summary.markers_removed);
        Ok(summary)
    }

    /// Runs a full pass: clear, then lint and annotate every paragraph.
    ///
    /// Failures before the first paragraph is linted are returned as `Err`.
    /// Once paragraphs are being visited, engine and resolution failures are
    /// recorded per unit and the pass continues; a fatal document error stops
    /// the pass and is recorded in [`RunReport::aborted`].
    pub async fn run(&self) -> Result<RunReport, AnnotateError> {
        let guard = PassGuard::begin(&self.state, self.progress.as_ref())?;

        let cleared = self.annotator.clear_all(&self.host).await?;
        let paragraphs = ParagraphIterator::new(&self.host).load().await?;
        let total = paragraphs.len();
        info!("Annotating {} paragraphs", total);

        let mut report = RunReport {
            cleared,
            paragraphs: Vec::with_capacity(total),
            aborted: None,
        };

        for (position, paragraph) in paragraphs.iter().enumerate() {
            guard.set(OrchestratorState::Linting {
                paragraph: paragraph.index,
            });
            self.progress.show(Progress::new(position, total, 0, 0));

            let output = match self.engine.lint(&paragraph.text, self.content_kind).await {
                Ok(output) => output,
                Err(e) => {
                    warn!("Lint failed for paragraph {}: {}", paragraph.index, e);
                    report.paragraphs.push(ParagraphReport {
                        index: paragraph.index,
                        outcome: ParagraphOutcome::EngineFailure(e),
                    });
                    continue;
                }
            };

            if output.messages.is_empty() {
                report.paragraphs.push(ParagraphReport {
                    index: paragraph.index,
                    outcome: ParagraphOutcome::Clean,
                });
                continue;
            }

            let issue_total = output.messages.len();
            debug!("Paragraph {}: {} issues", paragraph.index, issue_total);
            let mut issues = Vec::with_capacity(issue_total);
            let mut aborted = None;

            for (number, issue) in output.messages.into_iter().enumerate() {
                guard.set(OrchestratorState::Annotating {
                    paragraph: paragraph.index,
                    issue: number,
                });
                self.progress.show(Progress::new(position, total, number, issue_total));

                match self.annotate_issue(paragraph, &issue).await {
                    Ok(outcome) => issues.push(IssueReport { issue, outcome }),
                    Err(e) => {
                        aborted = Some(e);
                        break;
                    }
                }
            }

            report.paragraphs.push(ParagraphReport {
                index: paragraph.index,
                outcome: ParagraphOutcome::Linted(issues),
            });

            if let Some(e) = aborted {
                warn!("Annotation pass aborted at paragraph {}: {}", paragraph.index, e);
                report.aborted = Some(e);
                return Ok(report);
            }
        }

        info!(
            "Annotated {} issues in {} paragraphs",
            report.annotated_count(),
            total
        );
        Ok(report)
    }

    /// Resolves and annotates one issue. Only fatal document errors are
    /// returned as `Err`; everything else is an issue-scoped outcome.
    async fn annotate_issue(
        &self,
        paragraph: &Paragraph,
        issue: &LintIssue,
    ) -> Result<IssueOutcome, AnnotateError> {
        let range = match self
            .resolver
            .resolve(&self.host, paragraph, issue.line, issue.column)
            .await
        {
            Ok(range) => range,
            Err(ResolveError::Document(e)) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(
                    "Skipping [{}] at paragraph {} {}:{}: {}",
                    issue.rule_id, paragraph.index, issue.line, issue.column, e
                );
                return Ok(IssueOutcome::ResolutionFailure(e));
            }
        };

        match self.annotator.annotate(&self.host, range, &issue.message).await {
            Ok(annotation) => Ok(IssueOutcome::Annotated {
                range,
                marker: annotation.marker,
                accumulated: !annotation.created,
            }),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                warn!("Failed to annotate {}: {}", range, e);
                Ok(IssueOutcome::ResolutionFailure(ResolveError::Document(e)))
            }
        }
    }
}
