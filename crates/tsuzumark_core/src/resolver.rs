//! Line/column to document range resolution.
//!
//! A lint engine reports positions against the paragraph's plain text split
//! on soft line breaks. The resolver asks the host for the same split, picks
//! the reported line segment, and scans to the reported column, so the
//! resulting range addresses the live document rather than a string copy.

use tracing::trace;
use tsuzumark_document::{DocumentHost, LINE_BREAK, Paragraph, TextRange};

use crate::ResolveError;

/// Maps `(paragraph, line, column)` to a single-character [`TextRange`].
///
/// Lines are split on [`LINE_BREAK`] and columns count characters, the
/// same convention [`RuleKernel`](crate::RuleKernel) reports positions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeResolver;

impl RangeResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolves a 1-based line and 1-based column inside `paragraph`.
    ///
    /// A column pointing at the line's own delimiter, or beyond it, fails
    /// with [`ResolveError::ColumnOutOfRange`].
    pub async fn resolve<H: DocumentHost + ?Sized>(
        &self,
        host: &H,
        paragraph: &Paragraph,
        line: u32,
        column: u32,
    ) -> Result<TextRange, ResolveError> {
        if line == 0 || column == 0 {
            return Err(ResolveError::InvalidPosition { line, column });
        }

        let segments = host
            .split_paragraph(paragraph.index, LINE_BREAK)
            .await?;
        let segment = *segments
            .get(line as usize - 1)
            .ok_or(ResolveError::LineOutOfRange {
                line,
                lines: segments.len(),
            })?;

        let is_last = line as usize == segments.len();
        let has_delimiter = !is_last || paragraph.text.ends_with(LINE_BREAK);
        let len = if has_delimiter && !segment.is_empty() {
            segment.len() - 1
        } else {
            segment.len()
        };
        if column as usize > len {
            return Err(ResolveError::ColumnOutOfRange { line, column, len });
        }

        let found = host.search_chars(segment, column as usize - 1, 1).await?;
        host.sync().await?;

        let range = found
            .first()
            .copied()
            .ok_or(ResolveError::ColumnOutOfRange { line, column, len })?;
        trace!("Resolved {}:{} in paragraph {} to {}", line, column, paragraph.index, range);
        Ok(range)
    }
}
