//! Highlight and marker writes.

use serde::Serialize;
use tracing::debug;
use tsuzumark_document::{
    DocumentError, DocumentHost, HighlightColor, MESSAGE_SEPARATOR, Marker, MarkerId,
    MarkerRemoval, MarkerTag, TextRange,
};

/// Applies and removes lint annotations.
///
/// Only markers carrying the annotator's tag are ever read, written or
/// deleted; markers created by anyone else are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotator {
    tag: MarkerTag,
    color: HighlightColor,
    removal: MarkerRemoval,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(MarkerTag::LINT)
    }
}

/// Outcome of a single [`Annotator::annotate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub range: TextRange,
    pub marker: MarkerId,
    /// False if the message was appended to a marker already bound to the
    /// same range.
    pub created: bool,
}

/// Outcome of [`Annotator::clear_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearSummary {
    /// Paragraphs whose highlight was reset.
    pub paragraphs: usize,
    /// Tagged markers deleted.
    pub markers_removed: usize,
}

impl Annotator {
    pub fn new(tag: MarkerTag) -> Self {
        Self {
            tag,
            color: HighlightColor::default(),
            removal: MarkerRemoval::default(),
        }
    }

    pub fn with_color(mut self, color: HighlightColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_removal(mut self, removal: MarkerRemoval) -> Self {
        self.removal = removal;
        self
    }

    pub fn tag(&self) -> &MarkerTag {
        &self.tag
    }

    pub fn color(&self) -> HighlightColor {
        self.color
    }

    pub fn removal(&self) -> MarkerRemoval {
        self.removal
    }

    /// Highlights `range` and appends `message` to the marker bound to it,
    /// creating the marker if none exists. Flushes with a single `sync`.
    ///
    /// Either every write lands or none does: if queueing fails, the queue
    /// is discarded before returning. Expects no writes pending on entry.
    pub async fn annotate<H: DocumentHost + ?Sized>(
        &self,
        host: &H,
        range: TextRange,
        message: &str,
    ) -> Result<Annotation, DocumentError> {
        let existing = host.marker_at(range, &self.tag).await?;
        let created = existing.is_none();

        let marker = match self.queue_annotation(host, range, message, existing) {
            Ok(marker) => marker,
            Err(e) => {
                let dropped = host.discard_pending();
                debug!("Discarded {} queued writes for {}: {}", dropped, range, e);
                return Err(e);
            }
        };

        host.sync().await?;

        debug!(
            "{} marker {} at {}",
            if created { "Created" } else { "Extended" },
            marker,
            range
        );
        Ok(Annotation {
            range,
            marker,
            created,
        })
    }

    fn queue_annotation<H: DocumentHost + ?Sized>(
        &self,
        host: &H,
        range: TextRange,
        message: &str,
        existing: Option<Marker>,
    ) -> Result<MarkerId, DocumentError> {
        host.set_highlight(range, Some(self.color))?;

        let (marker, mut title) = match existing {
            Some(existing) => (existing.id, existing.title),
            None => (host.insert_marker(range, self.tag.clone())?, String::new()),
        };

        title.push_str(message);
        title.push(MESSAGE_SEPARATOR);
        host.set_marker_title(marker, title)?;
        Ok(marker)
    }

    /// Removes every highlight and every marker carrying this annotator's
    /// tag. Safe to call on a document without any.
    pub async fn clear_all<H: DocumentHost + ?Sized>(
        &self,
        host: &H,
    ) -> Result<ClearSummary, DocumentError> {
        let paragraphs = host.paragraphs().await?;
        for paragraph in &paragraphs {
            host.set_highlight(paragraph.range(), None)?;
        }
        host.sync().await?;

        let markers = host.markers_by_tag(&self.tag).await?;
        for marker in &markers {
            host.delete_marker(marker.id, self.removal)?;
        }
        host.sync().await?;

        debug!(
            "Cleared {} paragraphs, removed {} markers",
            paragraphs.len(),
            markers.len()
        );
        Ok(ClearSummary {
            paragraphs: paragraphs.len(),
            markers_removed: markers.len(),
        })
    }
}
