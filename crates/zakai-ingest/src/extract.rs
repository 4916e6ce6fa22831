use crate::kind::{DocumentKind, FileKind};
use crate::{docx, pdf, sheet};
use tracing::info;
use zakai_core::ZakaiResult;

/// Outcome of turning an upload into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The document's plain text.
    Text(String),
    /// The extension is not a document this extractor reads.
    Unsupported,
    /// A human-readable instruction shown instead of text, e.g. when the
    /// spreadsheet engine is compiled out.
    Diagnostic(String),
}

impl Extraction {
    /// The extracted text, if there is any that is not blank.
    pub fn text(&self) -> Option<&str> {
        match self {
            Extraction::Text(t) if !t.trim().is_empty() => Some(t),
            _ => None,
        }
    }
}

/// Extracts plain text from an uploaded document, dispatching on its extension.
///
/// Unknown extensions yield [`Extraction::Unsupported`] and never an error.
/// Parse failures are returned as [`zakai_core::ZakaiError::Extraction`].
pub fn extract(file_name: &str, bytes: &[u8]) -> ZakaiResult<Extraction> {
    let kind = match FileKind::from_name(file_name) {
        FileKind::Document(kind) => kind,
        FileKind::Image | FileKind::Other => return Ok(Extraction::Unsupported),
    };

    let extraction = match kind {
        DocumentKind::Pdf => Extraction::Text(pdf::join_pages(&pdf::read_pages(bytes)?)),
        DocumentKind::Word => Extraction::Text(docx::read_paragraphs(bytes)?.join("\n")),
        DocumentKind::Spreadsheet => spreadsheet(bytes)?,
    };

    if let Extraction::Text(text) = &extraction {
        info!(file = file_name, kind = ?kind, chars = text.len(), "Document text extracted");
    }
    Ok(extraction)
}

#[cfg(feature = "spreadsheet")]
fn spreadsheet(bytes: &[u8]) -> ZakaiResult<Extraction> {
    Ok(Extraction::Text(sheet::render_workbook(bytes)?))
}

#[cfg(not(feature = "spreadsheet"))]
fn spreadsheet(_bytes: &[u8]) -> ZakaiResult<Extraction> {
    Ok(Extraction::Diagnostic(sheet::MISSING_ENGINE_DIAGNOSTIC.to_string()))
}
