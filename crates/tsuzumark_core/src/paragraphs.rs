//! Paragraph enumeration.

use tracing::debug;
use tsuzumark_document::{DocumentHost, Paragraph};

use crate::AnnotateError;

/// Enumerates a document's paragraphs in document order.
#[derive(Debug)]
pub struct ParagraphIterator<'a, H: ?Sized> {
    host: &'a H,
}

impl<'a, H: DocumentHost + ?Sized> ParagraphIterator<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Loads every paragraph as it is at call time.
    ///
    /// The returned list is a snapshot; later document edits do not change
    /// it.
    pub async fn load(&self) -> Result<Vec<Paragraph>, AnnotateError> {
        let paragraphs = self.host.paragraphs().await?;
        debug!("Loaded {} paragraphs", paragraphs.len());
        Ok(paragraphs)
    }
}
