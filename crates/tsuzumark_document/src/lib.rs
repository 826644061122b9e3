//! # tsuzumark_document
//!
//! Document host interface for TsuzuMark.
//!
//! This crate provides:
//! - The `DocumentHost` trait a live, annotatable document implements
//! - Paragraph, range, highlight and marker types
//! - `MemoryDocument`, an in-memory host with queued writes
//!
//! ## Features
//!
//! - `test-utils`: `FaultyDocument`, a host wrapper that injects failures
//!
//! ## Example
//!
//! ```rust
//! use tsuzumark_document::{DocumentHost, HighlightColor, MemoryDocument, TextRange};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let doc = MemoryDocument::new(["hello"]);
//! doc.set_highlight(TextRange::single(0, 1), Some(HighlightColor::Yellow)).unwrap();
//! doc.sync().await.unwrap();
//! assert_eq!(doc.highlight_at(0, 1), Some(HighlightColor::Yellow));
//! # });
//! ```

mod error;
mod host;
mod marker;
mod memory;
mod range;
mod style;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::DocumentError;
pub use host::DocumentHost;
pub use marker::{MESSAGE_SEPARATOR, Marker, MarkerId, MarkerRemoval, MarkerTag};
pub use memory::MemoryDocument;
pub use range::{LINE_BREAK, Paragraph, TextRange};
pub use style::HighlightColor;
