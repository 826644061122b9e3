//! In-memory document host.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    DocumentError, DocumentHost, HighlightColor, LINE_BREAK, Marker, MarkerId, MarkerRemoval,
    MarkerTag, Paragraph, TextRange,
};

/// An in-memory document with queued writes.
///
/// Cloning the handle shares the same document, so a caller can keep one
/// clone for inspection while another drives an annotation pass.
///
/// # Example
///
/// ```rust
/// use tsuzumark_document::MemoryDocument;
///
/// let doc = MemoryDocument::from_plain_text("first paragraph\n\nsecond\nwith a soft break");
/// assert_eq!(doc.paragraph_count(), 2);
/// assert_eq!(doc.paragraph_text(1).as_deref(), Some("second\nwith a soft break"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    paragraphs: Vec<ParagraphState>,
    /// Committed markers in creation order.
    markers: Vec<Marker>,
    pending: Vec<Write>,
    next_marker: u64,
    syncs: usize,
    closed: bool,
}

#[derive(Debug, Clone)]
struct ParagraphState {
    chars: Vec<char>,
    highlights: Vec<Option<HighlightColor>>,
}

impl ParagraphState {
    fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let highlights = vec![None; chars.len()];
        Self { chars, highlights }
    }

    fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

#[derive(Debug)]
enum Write {
    Highlight {
        range: TextRange,
        color: Option<HighlightColor>,
    },
    InsertMarker {
        id: MarkerId,
        range: TextRange,
        tag: MarkerTag,
    },
    SetTitle {
        id: MarkerId,
        title: String,
    },
    DeleteMarker {
        id: MarkerId,
        removal: MarkerRemoval,
    },
}

impl MemoryDocument {
    /// Creates a document from paragraph texts.
    pub fn new<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paragraphs = paragraphs
            .into_iter()
            .map(|p| ParagraphState::new(p.as_ref()))
            .collect();
        Self {
            inner: Arc::new(Mutex::new(Inner {
                paragraphs,
                ..Inner::default()
            })),
        }
    }

    /// Creates a document from plain text.
    ///
    /// Blank lines separate paragraphs; a single line break stays inside its
    /// paragraph as a soft break. `\r\n` is normalized to `\n`.
    pub fn from_plain_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in normalized.split(LINE_BREAK) {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join("\n"));
        }

        Self::new(paragraphs)
    }

    /// Returns the number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.inner.lock().paragraphs.len()
    }

    /// Returns the committed text of a paragraph.
    pub fn paragraph_text(&self, index: usize) -> Option<String> {
        self.inner.lock().paragraphs.get(index).map(|p| p.text())
    }

    /// Returns the committed highlight of one character.
    pub fn highlight_at(&self, paragraph: usize, offset: usize) -> Option<HighlightColor> {
        self.inner
            .lock()
            .paragraphs
            .get(paragraph)
            .and_then(|p| p.highlights.get(offset).copied().flatten())
    }

    /// Returns every highlighted run, merging adjacent characters that share
    /// a color.
    pub fn highlighted_ranges(&self) -> Vec<(TextRange, HighlightColor)> {
        let inner = self.inner.lock();
        let mut runs = Vec::new();

        for (index, paragraph) in inner.paragraphs.iter().enumerate() {
            let mut current: Option<(usize, HighlightColor)> = None;
            for (offset, highlight) in paragraph.highlights.iter().enumerate() {
                match (current, highlight) {
                    (Some((_, color)), Some(h)) if color == *h => {}
                    (Some((start, color)), _) => {
                        runs.push((TextRange::new(index, start, offset), color));
                        current = highlight.map(|h| (offset, h));
                    }
                    (None, _) => current = highlight.map(|h| (offset, h)),
                }
            }
            if let Some((start, color)) = current {
                runs.push((
                    TextRange::new(index, start, paragraph.highlights.len()),
                    color,
                ));
            }
        }

        runs
    }

    /// Returns every committed marker regardless of tag.
    pub fn markers(&self) -> Vec<Marker> {
        self.inner.lock().markers.clone()
    }

    /// Returns the number of queued writes not yet synced.
    pub fn pending_writes(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Returns how many times `sync` has been called.
    pub fn sync_count(&self) -> usize {
        self.inner.lock().syncs
    }

    /// Closes the document. Every later host call fails with
    /// [`DocumentError::Unavailable`].
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.pending.clear();
    }

    /// Returns true if the document has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl Inner {
    fn check_open(&self) -> Result<(), DocumentError> {
        if self.closed {
            Err(DocumentError::unavailable("document is closed"))
        } else {
            Ok(())
        }
    }

    fn paragraph(&self, index: usize) -> Result<&ParagraphState, DocumentError> {
        self.paragraphs
            .get(index)
            .ok_or(DocumentError::UnknownParagraph(index))
    }

    fn check_range(&self, range: &TextRange) -> Result<(), DocumentError> {
        let paragraph = self.paragraph(range.paragraph)?;
        if range.start > range.end || range.end > paragraph.chars.len() {
            return Err(DocumentError::invalid_range(format!(
                "{} exceeds paragraph length {}",
                range,
                paragraph.chars.len()
            )));
        }
        Ok(())
    }

    fn marker_index(&self, id: MarkerId) -> Result<usize, DocumentError> {
        self.markers
            .iter()
            .position(|m| m.id == id)
            .ok_or(DocumentError::UnknownMarker(id))
    }

    fn apply(&mut self, write: Write) -> Result<(), DocumentError> {
        match write {
            Write::Highlight { range, color } => {
                self.check_range(&range)?;
                let paragraph = &mut self.paragraphs[range.paragraph];
                paragraph.highlights[range.start..range.end].fill(color);
            }
            Write::InsertMarker { id, range, tag } => {
                self.check_range(&range)?;
                self.markers.push(Marker {
                    id,
                    tag,
                    range,
                    title: String::new(),
                });
            }
            Write::SetTitle { id, title } => {
                let index = self.marker_index(id)?;
                self.markers[index].title = title;
            }
            Write::DeleteMarker { id, removal } => {
                let index = self.marker_index(id)?;
                let marker = self.markers.remove(index);
                if removal == MarkerRemoval::WithContent {
                    self.remove_content(marker.range);
                }
            }
        }
        Ok(())
    }

    /// Removes the characters of `range` and shifts every later marker of
    /// the same paragraph. Markers overlapping the removed run are clipped.
    fn remove_content(&mut self, range: TextRange) {
        if range.is_empty() {
            return;
        }
        let paragraph = &mut self.paragraphs[range.paragraph];
        paragraph.chars.drain(range.start..range.end);
        paragraph.highlights.drain(range.start..range.end);

        let removed = range.len();
        let shift = |offset: usize| {
            if offset <= range.start {
                offset
            } else if offset >= range.end {
                offset - removed
            } else {
                range.start
            }
        };
        for marker in &mut self.markers {
            if marker.range.paragraph == range.paragraph {
                marker.range.start = shift(marker.range.start);
                marker.range.end = shift(marker.range.end);
            }
        }
    }

    fn queue(&mut self, write: Write) -> Result<(), DocumentError> {
        self.check_open()?;
        self.pending.push(write);
        Ok(())
    }
}

#[async_trait]
impl DocumentHost for MemoryDocument {
    async fn paragraphs(&self) -> Result<Vec<Paragraph>, DocumentError> {
        let inner = self.inner.lock();
        inner.check_open()?;
        Ok(inner
            .paragraphs
            .iter()
            .enumerate()
            .map(|(index, p)| Paragraph::new(index, p.text()))
            .collect())
    }

    async fn split_paragraph(
        &self,
        paragraph: usize,
        delimiter: char,
    ) -> Result<Vec<TextRange>, DocumentError> {
        let inner = self.inner.lock();
        inner.check_open()?;
        let state = inner.paragraph(paragraph)?;

        let mut segments = Vec::new();
        let mut start = 0;
        for (offset, c) in state.chars.iter().enumerate() {
            if *c == delimiter {
                segments.push(TextRange::new(paragraph, start, offset + 1));
                start = offset + 1;
            }
        }
        if start < state.chars.len() || segments.is_empty() {
            segments.push(TextRange::new(paragraph, start, state.chars.len()));
        }

        Ok(segments)
    }

    async fn search_chars(
        &self,
        within: TextRange,
        skip: usize,
        take: usize,
    ) -> Result<Vec<TextRange>, DocumentError> {
        let inner = self.inner.lock();
        inner.check_open()?;
        inner.check_range(&within)?;

        let first = within.start.saturating_add(skip).min(within.end);
        let last = first.saturating_add(take).min(within.end);
        Ok((first..last)
            .map(|offset| TextRange::single(within.paragraph, offset))
            .collect())
    }

    async fn markers_by_tag(&self, tag: &MarkerTag) -> Result<Vec<Marker>, DocumentError> {
        let inner = self.inner.lock();
        inner.check_open()?;
        Ok(inner
            .markers
            .iter()
            .filter(|m| &m.tag == tag)
            .cloned()
            .collect())
    }

    async fn marker_at(
        &self,
        range: TextRange,
        tag: &MarkerTag,
    ) -> Result<Option<Marker>, DocumentError> {
        let inner = self.inner.lock();
        inner.check_open()?;
        Ok(inner
            .markers
            .iter()
            .find(|m| m.range == range && &m.tag == tag)
            .cloned())
    }

    fn set_highlight(
        &self,
        range: TextRange,
        color: Option<HighlightColor>,
    ) -> Result<(), DocumentError> {
        self.inner.lock().queue(Write::Highlight { range, color })
    }

    fn insert_marker(&self, range: TextRange, tag: MarkerTag) -> Result<MarkerId, DocumentError> {
        let mut inner = self.inner.lock();
        inner.check_open()?;
        inner.next_marker += 1;
        let id = MarkerId(inner.next_marker);
        inner.queue(Write::InsertMarker { id, range, tag })?;
        Ok(id)
    }

    fn set_marker_title(&self, id: MarkerId, title: String) -> Result<(), DocumentError> {
        self.inner.lock().queue(Write::SetTitle { id, title })
    }

    fn delete_marker(&self, id: MarkerId, removal: MarkerRemoval) -> Result<(), DocumentError> {
        self.inner.lock().queue(Write::DeleteMarker { id, removal })
    }

    fn discard_pending(&self) -> usize {
        let mut inner = self.inner.lock();
        let dropped = inner.pending.len();
        inner.pending.clear();
        dropped
    }

    async fn sync(&self) -> Result<(), DocumentError> {
        let mut inner = self.inner.lock();
        inner.check_open()?;
        inner.syncs += 1;

        let pending = std::mem::take(&mut inner.pending);
        let total = pending.len();
        for (applied, write) in pending.into_iter().enumerate() {
            if let Err(e) = inner.apply(write) {
                debug!("Sync stopped after {}/{} writes: {}", applied, total, e);
                return Err(DocumentError::sync(e.to_string()));
            }
        }

        debug!("Synced {} writes", total);
        Ok(())
    }
}
