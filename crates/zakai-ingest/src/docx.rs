use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use zakai_core::{ZakaiError, ZakaiResult};

/// Text of every top-level paragraph, in document order.
///
/// Empty paragraphs are kept so that indices line up with the document.
/// Paragraphs inside tables are not part of the body flow and are skipped.
pub fn read_paragraphs(bytes: &[u8]) -> ZakaiResult<Vec<String>> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ZakaiError::Extraction(format!("cannot parse Word document: {e}")))?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect();
    Ok(paragraphs)
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}
