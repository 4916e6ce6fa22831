use chrono::{SecondsFormat, Utc};
use docx_rs::{Comment, Docx, Paragraph, Run};
use regex::Regex;
use std::sync::OnceLock;
use zakai_core::{ZakaiError, ZakaiResult};

/// Author recorded on every inserted comment.
pub const COMMENT_AUTHOR: &str = "ZakAI";
/// Color of the inline marker run (hex RGB).
pub const MARKER_COLOR: &str = "FF0000";

/// A revision suggestion for one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// 0-based paragraph index in the document.
    pub paragraph: usize,
    /// The suggested revision.
    pub text: String,
}

/// Lists the non-empty paragraphs as `[n] text` lines, 1-based.
///
/// Empty paragraphs keep their number so that replies map back onto the
/// document without shifting.
pub fn numbered_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.as_ref().trim().is_empty())
        .map(|(i, p)| format!("[{}] {}", i + 1, p.as_ref().trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(clippy::unwrap_used)]
fn suggestion_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[?(\d+)\]?\s*[.:)\-]?\s*(.+?)\s*$").unwrap())
}

/// Parses a reply of `n: suggestion` (or `[n] suggestion`) lines.
///
/// Lines that do not start with a paragraph number, numbers outside the
/// document, and "no change" answers (`-`) are ignored. When a paragraph is
/// named twice the first suggestion wins.
pub fn parse_suggestions(reply: &str, paragraph_count: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = Vec::new();
    for line in reply.lines() {
        let Some(caps) = suggestion_line().captures(line) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<usize>() else {
            continue;
        };
        if number == 0 || number > paragraph_count {
            continue;
        }
        let text = caps[2].trim();
        if text.is_empty() || text == "-" {
            continue;
        }
        let paragraph = number - 1;
        if suggestions.iter().any(|s| s.paragraph == paragraph) {
            continue;
        }
        suggestions.push(Suggestion {
            paragraph,
            text: text.to_string(),
        });
    }
    suggestions.sort_by_key(|s| s.paragraph);
    suggestions
}

/// Builds a document with every suggestion spliced into its paragraph.
///
/// Each annotated paragraph is wrapped in a comment range whose comment holds
/// the suggestion, followed by a colored `[Suggestion: ...]` marker run. Every
/// comment start is paired with its end.
pub fn annotated_docx<S: AsRef<str>>(paragraphs: &[S], suggestions: &[Suggestion]) -> Docx {
    let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut docx = Docx::new();
    let mut next_id = 1usize;

    for (index, text) in paragraphs.iter().enumerate() {
        let mut paragraph = Paragraph::new();
        match suggestions.iter().find(|s| s.paragraph == index) {
            Some(suggestion) => {
                let id = next_id;
                next_id += 1;
                let comment = Comment::new(id)
                    .author(COMMENT_AUTHOR)
                    .date(date.clone())
                    .add_paragraph(
                        Paragraph::new().add_run(Run::new().add_text(suggestion.text.clone())),
                    );
                paragraph = paragraph
                    .add_comment_start(comment)
                    .add_run(Run::new().add_text(text.as_ref()))
                    .add_comment_end(id)
                    .add_run(
                        Run::new()
                            .add_text(format!(" [Suggestion: {}]", suggestion.text))
                            .color(MARKER_COLOR)
                            .bold(),
                    );
            }
            None if !text.as_ref().is_empty() => {
                paragraph = paragraph.add_run(Run::new().add_text(text.as_ref()));
            }
            None => {}
        }
        docx = docx.add_paragraph(paragraph);
    }
    docx
}

/// Packs [`annotated_docx`] into the bytes of a `.docx` file.
pub fn annotate<S: AsRef<str>>(paragraphs: &[S], suggestions: &[Suggestion]) -> ZakaiResult<Vec<u8>> {
    let mut buf = Vec::new();
    annotated_docx(paragraphs, suggestions)
        .build()
        .pack(&mut std::io::Cursor::new(&mut buf))
        .map_err(|e| ZakaiError::Extraction(format!("cannot write revised document: {e}")))?;
    Ok(buf)
}

/// File name under which a revised copy is offered.
pub fn revised_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    format!("revised_{base}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_paragraphs_skip_blank_but_keep_numbers() {
        let listing = numbered_paragraphs(&["Intro", "", "  Body  "]);
        assert_eq!(listing, "[1] Intro\n[3] Body");
    }

    #[test]
    fn test_parse_suggestions_formats() {
        let reply = "Here are my suggestions:\n\
                     1: Use an active voice.\n\
                     [2] -\n\
                     3) Split the sentence.\n\
                     9: out of range\n\
                     1: duplicate is ignored";
        let suggestions = parse_suggestions(reply, 3);
        assert_eq!(
            suggestions,
            vec![
                Suggestion {
                    paragraph: 0,
                    text: "Use an active voice.".into()
                },
                Suggestion {
                    paragraph: 2,
                    text: "Split the sentence.".into()
                },
            ]
        );
    }

    #[test]
    fn test_comment_ranges_are_paired() {
        let suggestions = vec![
            Suggestion {
                paragraph: 0,
                text: "Shorter title".into(),
            },
            Suggestion {
                paragraph: 2,
                text: "Add a conclusion".into(),
            },
        ];
        let xml = annotated_docx(&["Title", "Middle", "End"], &suggestions).build();
        let document = String::from_utf8_lossy(&xml.document).to_string();
        let comments = String::from_utf8_lossy(&xml.comments).to_string();

        assert_eq!(document.matches("commentRangeStart").count(), 2);
        assert_eq!(document.matches("commentRangeEnd").count(), 2);
        assert!(document.contains("[Suggestion: Shorter title]"));
        assert!(document.contains(MARKER_COLOR));
        assert!(comments.contains("Add a conclusion"));
        assert!(comments.contains(COMMENT_AUTHOR));
    }

    #[test]
    fn test_annotate_round_trips_through_reader() {
        let suggestions = vec![Suggestion {
            paragraph: 1,
            text: "Be specific".into(),
        }];
        let bytes = annotate(&["Intro", "Body", ""], &suggestions).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let paragraphs = crate::docx::read_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["Intro", "Body [Suggestion: Be specific]", ""]);
    }

    #[test]
    fn test_revised_file_name() {
        assert_eq!(revised_file_name("draft.docx"), "revised_draft.docx");
        assert_eq!(revised_file_name("/tmp/x/draft.docx"), "revised_draft.docx");
    }
}
