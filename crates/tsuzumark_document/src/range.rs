//! Paragraph and range types.
//!
//! Offsets are counted in Unicode scalar values (`char`) from the start of
//! the paragraph text, matching how a lint engine counts columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Soft line break inside a single paragraph.
pub const LINE_BREAK: char = '\n';

/// One paragraph of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Position in the document (0-indexed).
    pub index: usize,
    /// Plain-text content. May contain [`LINE_BREAK`] soft breaks.
    pub text: String,
}

impl Paragraph {
    /// Creates a new paragraph.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Returns the number of characters in the paragraph.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns the range covering the whole paragraph text.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.index, 0, self.char_len())
    }
}

/// A half-open character range inside one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    /// Paragraph index.
    pub paragraph: usize,
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Creates a new range.
    #[inline]
    pub const fn new(paragraph: usize, start: usize, end: usize) -> Self {
        Self {
            paragraph,
            start,
            end,
        }
    }

    /// Creates a range selecting exactly one character.
    #[inline]
    pub const fn single(paragraph: usize, offset: usize) -> Self {
        Self::new(paragraph, offset, offset + 1)
    }

    /// Returns the length of the range in characters.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if both ranges share at least one character.
    #[inline]
    pub const fn overlaps(&self, other: &TextRange) -> bool {
        self.paragraph == other.paragraph && self.start < other.end && other.start < self.end
    }

    /// Returns true if `other` lies entirely within this range.
    #[inline]
    pub const fn contains(&self, other: &TextRange) -> bool {
        self.paragraph == other.paragraph && self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.paragraph, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_range_counts_chars() {
        let paragraph = Paragraph::new(2, "AのAがBも");
        assert_eq!(paragraph.char_len(), 6);
        assert_eq!(paragraph.range(), TextRange::new(2, 0, 6));
    }

    #[test]
    fn test_range_single() {
        let range = TextRange::single(0, 2);
        assert_eq!(range.len(), 1);
        assert!(!range.is_empty());
    }

    #[test]
    fn test_range_overlaps() {
        let a = TextRange::new(0, 0, 3);
        let b = TextRange::new(0, 2, 5);
        let c = TextRange::new(0, 3, 5);
        let d = TextRange::new(1, 0, 3);

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_range_contains() {
        let outer = TextRange::new(0, 0, 10);
        assert!(outer.contains(&TextRange::new(0, 2, 4)));
        assert!(!outer.contains(&TextRange::new(0, 8, 11)));
        assert!(!outer.contains(&TextRange::new(1, 2, 4)));
    }

    #[test]
    fn test_range_display() {
        assert_eq!(TextRange::new(3, 1, 2).to_string(), "3[1..2]");
    }
}
