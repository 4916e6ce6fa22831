//! File ingestion for ZakAI.
//!
//! Uploaded files are classified by extension ([`FileKind`]); documents are
//! turned into plain text by [`extract`], and `.docx` files can be rewritten
//! with inline revision suggestions by [`revision::annotate`].

/// Paragraph reading for Word documents.
pub mod docx;
/// Extension-based dispatch to the format readers.
pub mod extract;
/// Upload classification by file name.
pub mod kind;
/// Page-ordered PDF text.
pub mod pdf;
/// Revision suggestions spliced into a Word document.
pub mod revision;
/// Spreadsheet rendering.
pub mod sheet;

pub use extract::{extract, Extraction};
pub use kind::{file_extension, image_mime, DocumentKind, FileKind};
pub use revision::Suggestion;
