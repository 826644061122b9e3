//! Fault injection for document host tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    DocumentError, DocumentHost, HighlightColor, Marker, MarkerId, MarkerRemoval, MarkerTag,
    MemoryDocument, Paragraph, TextRange,
};

/// Wraps a [`MemoryDocument`] and fails chosen calls.
///
/// Call counts are 1-based: `fail_sync_at(3)` makes the third `sync` fail.
#[derive(Debug, Default)]
pub struct FaultyDocument {
    inner: MemoryDocument,
    syncs: AtomicUsize,
    paragraph_reads: AtomicUsize,
    marker_inserts: AtomicUsize,
    fail_sync_at: Option<usize>,
    unavailable_after_syncs: Option<usize>,
    fail_paragraph_read_at: Option<usize>,
    fail_insert_marker_at: Option<usize>,
}

impl FaultyDocument {
    /// Wraps a document without any fault configured.
    pub fn new(inner: MemoryDocument) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Makes the n-th `sync` fail with [`DocumentError::Sync`], discarding
    /// its queued writes.
    pub fn fail_sync_at(mut self, n: usize) -> Self {
        self.fail_sync_at = Some(n);
        self
    }

    /// Closes the document right after the n-th `sync` completes.
    pub fn unavailable_after_syncs(mut self, n: usize) -> Self {
        self.unavailable_after_syncs = Some(n);
        self
    }

    /// Makes the n-th `paragraphs` read fail with
    /// [`DocumentError::Unavailable`].
    pub fn fail_paragraph_read_at(mut self, n: usize) -> Self {
        self.fail_paragraph_read_at = Some(n);
        self
    }

    /// Makes the n-th `insert_marker` fail with
    /// [`DocumentError::InvalidRange`] without queueing anything.
    pub fn fail_insert_marker_at(mut self, n: usize) -> Self {
        self.fail_insert_marker_at = Some(n);
        self
    }

    /// Returns the wrapped document.
    pub fn document(&self) -> &MemoryDocument {
        &self.inner
    }
}

#[async_trait]
impl DocumentHost for FaultyDocument {
    async fn paragraphs(&self) -> Result<Vec<Paragraph>, DocumentError> {
        let n = self.paragraph_reads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_paragraph_read_at == Some(n) {
            return Err(DocumentError::unavailable("injected read failure"));
        }
        self.inner.paragraphs().await
    }

    async fn split_paragraph(
        &self,
        paragraph: usize,
        delimiter: char,
    ) -> Result<Vec<TextRange>, DocumentError> {
        self.inner.split_paragraph(paragraph, delimiter).await
    }

    async fn search_chars(
        &self,
        within: TextRange,
        skip: usize,
        take: usize,
    ) -> Result<Vec<TextRange>, DocumentError> {
        self.inner.search_chars(within, skip, take).await
    }

    async fn markers_by_tag(&self, tag: &MarkerTag) -> Result<Vec<Marker>, DocumentError> {
        self.inner.markers_by_tag(tag).await
    }

    async fn marker_at(
        &self,
        range: TextRange,
        tag: &MarkerTag,
    ) -> Result<Option<Marker>, DocumentError> {
        self.inner.marker_at(range, tag).await
    }

    fn set_highlight(
        &self,
        range: TextRange,
        color: Option<HighlightColor>,
    ) -> Result<(), DocumentError> {
        self.inner.set_highlight(range, color)
    }

    fn insert_marker(&self, range: TextRange, tag: MarkerTag) -> Result<MarkerId, DocumentError> {
        let n = self.marker_inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_insert_marker_at == Some(n) {
            return Err(DocumentError::invalid_range(format!(
                "injected insert failure at {range}"
            )));
        }
        self.inner.insert_marker(range, tag)
    }

    fn set_marker_title(&self, id: MarkerId, title: String) -> Result<(), DocumentError> {
        self.inner.set_marker_title(id, title)
    }

    fn delete_marker(&self, id: MarkerId, removal: MarkerRemoval) -> Result<(), DocumentError> {
        self.inner.delete_marker(id, removal)
    }

    fn discard_pending(&self) -> usize {
        self.inner.discard_pending()
    }

    async fn sync(&self) -> Result<(), DocumentError> {
        let n = self.syncs.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_sync_at == Some(n) {
            self.inner.discard_pending();
            return Err(DocumentError::sync("injected sync failure"));
        }
        let result = self.inner.sync().await;
        if self.unavailable_after_syncs == Some(n) {
            self.inner.close();
        }
        result
    }
}
