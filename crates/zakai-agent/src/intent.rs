use crate::config::IntentConfig;
use serde::{Deserialize, Serialize};
use zakai_session::{Attachment, Session};

/// Which branch a text submission takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Annotate the attached `.docx` with revision suggestions.
    ReviseDocument,
    /// Produce an image from the utterance.
    GenerateImage,
    /// Plain conversation.
    Chat,
}

/// Keyword-based router for text submissions.
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    config: IntentConfig,
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}

impl IntentClassifier {
    pub fn new(config: IntentConfig) -> Self {
        Self { config }
    }

    /// A revision keyword is present and the current attachment is a `.docx`.
    pub fn is_revision_request(&self, session: &Session, input: &str) -> bool {
        let input = input.to_lowercase();
        contains_any(&input, &self.config.revision_keywords)
            && session.attachment.as_ref().is_some_and(Attachment::is_docx)
    }

    /// Both a "create" keyword and an "image" keyword are present.
    pub fn is_image_generation_request(&self, _session: &Session, input: &str) -> bool {
        let input = input.to_lowercase();
        contains_any(&input, &self.config.create_keywords)
            && contains_any(&input, &self.config.image_keywords)
    }

    /// Revision wins over image generation; everything else is chat.
    pub fn classify(&self, session: &Session, input: &str) -> Intent {
        if self.is_revision_request(session, input) {
            Intent::ReviseDocument
        } else if self.is_image_generation_request(session, input) {
            Intent::GenerateImage
        } else {
            Intent::Chat
        }
    }
}
