use lopdf::Document;
use tracing::{debug, warn};
use zakai_core::{ZakaiError, ZakaiResult};

/// Plain text of every page, in page order.
pub fn read_pages(bytes: &[u8]) -> ZakaiResult<Vec<String>> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ZakaiError::Extraction(format!("cannot parse PDF: {e}")))?;

    // get_pages is keyed by 1-based page number, so iteration is page order.
    let pages = doc.get_pages();
    debug!(pages = pages.len(), "Extracting PDF text");

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => texts.push(text.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                warn!(page = page_number, error = %e, "PDF page has no extractable text");
                texts.push(String::new());
            }
        }
    }
    Ok(texts)
}

/// Joins page texts with one newline between consecutive pages.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n")
}
