//! Progress reporting.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Position of an annotation pass.
///
/// Indices are 0-based; [`fmt::Display`] renders them 1-based. `issue` is
/// only meaningful when `issues > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub paragraph: usize,
    pub paragraphs: usize,
    pub issue: usize,
    pub issues: usize,
}

impl Progress {
    pub fn new(paragraph: usize, paragraphs: usize, issue: usize, issues: usize) -> Self {
        Self {
            paragraph,
            paragraphs,
            issue,
            issues,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issue = if self.issues == 0 { 0 } else { self.issue + 1 };
        write!(
            f,
            "paragraph {}/{}, issue {}/{}",
            self.paragraph + 1,
            self.paragraphs,
            issue,
            self.issues
        )
    }
}

/// Receives progress updates from an orchestrator.
pub trait ProgressSink: Send + Sync {
    /// Shows or updates the progress indicator.
    fn show(&self, progress: Progress);

    /// Hides the progress indicator.
    fn hide(&self);
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn show(&self, _progress: Progress) {}

    fn hide(&self) {}
}

/// Emits every update as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn show(&self, progress: Progress) {
        debug!("Progress: {}", progress);
    }

    fn hide(&self) {
        debug!("Progress hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Progress::new(0, 3, 0, 2), "paragraph 1/3, issue 1/2")]
    #[case(Progress::new(2, 3, 1, 2), "paragraph 3/3, issue 2/2")]
    #[case(Progress::new(1, 3, 0, 0), "paragraph 2/3, issue 0/0")]
    fn test_display(#[case] progress: Progress, #[case] expected: &str) {
        assert_eq!(progress.to_string(), expected);
    }
}
