//! Document host abstraction.
//!
//! A host owns a live, mutable document shared with other actors. Writes are
//! queued and only become visible once [`DocumentHost::sync`] completes, so a
//! caller must sync before trusting any positional lookup that depends on
//! earlier writes.

use async_trait::async_trait;

use crate::{
    DocumentError, HighlightColor, Marker, MarkerId, MarkerRemoval, MarkerTag, Paragraph,
    TextRange,
};

/// Trait for documents that can be annotated.
///
/// Reads are asynchronous and observe committed state. Writes are queued
/// and applied in order by `sync`.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Loads every paragraph, in document order.
    async fn paragraphs(&self) -> Result<Vec<Paragraph>, DocumentError>;

    /// Splits a paragraph into sub-ranges delimited by `delimiter`.
    ///
    /// Each sub-range runs up to and including its delimiter; the last one
    /// runs to the end of the paragraph. An empty paragraph yields one empty
    /// sub-range.
    async fn split_paragraph(
        &self,
        paragraph: usize,
        delimiter: char,
    ) -> Result<Vec<TextRange>, DocumentError>;

    /// Returns single-character ranges inside `within`, skipping the first
    /// `skip` characters and returning at most `take`.
    async fn search_chars(
        &self,
        within: TextRange,
        skip: usize,
        take: usize,
    ) -> Result<Vec<TextRange>, DocumentError>;

    /// Returns every committed marker carrying `tag`, in creation order.
    async fn markers_by_tag(&self, tag: &MarkerTag) -> Result<Vec<Marker>, DocumentError>;

    /// Returns the committed marker carrying `tag` bound to exactly `range`.
    async fn marker_at(
        &self,
        range: TextRange,
        tag: &MarkerTag,
    ) -> Result<Option<Marker>, DocumentError>;

    /// Queues a highlight change. `None` clears the highlight.
    fn set_highlight(
        &self,
        range: TextRange,
        color: Option<HighlightColor>,
    ) -> Result<(), DocumentError>;

    /// Queues creation of a marker bound to `range`.
    ///
    /// The id is allocated immediately so later queued writes can refer to
    /// it; the marker itself becomes visible after `sync`.
    fn insert_marker(&self, range: TextRange, tag: MarkerTag) -> Result<MarkerId, DocumentError>;

    /// Queues a title change on a marker.
    fn set_marker_title(&self, id: MarkerId, title: String) -> Result<(), DocumentError>;

    /// Queues deletion of a marker.
    fn delete_marker(&self, id: MarkerId, removal: MarkerRemoval) -> Result<(), DocumentError>;

    /// Drops every queued write without applying it. Returns how many were
    /// dropped.
    fn discard_pending(&self) -> usize;

    /// Applies queued writes in order.
    ///
    /// A failing write stops the flush with [`DocumentError::Sync`]; writes
    /// applied before it stay committed and the rest are discarded.
    async fn sync(&self) -> Result<(), DocumentError>;
}
