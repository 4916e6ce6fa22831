use crate::llm::{ChatMessage, CompletionRequest, LlmClient};
use tracing::info;
use zakai_core::{Role, ZakaiError, ZakaiResult};
use zakai_ingest::{docx, revision, Suggestion};

/// Instruction for the per-paragraph review request.
pub const REVIEW_SYSTEM_PROMPT: &str =
    "You are an editor. You review documents paragraph by paragraph and suggest concrete revisions.";

/// A revised copy of a document, ready to download.
#[derive(Debug, Clone)]
pub struct RevisedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub suggestions: Vec<Suggestion>,
}

/// Requests revision suggestions for a `.docx` and writes them back into it.
#[derive(Clone)]
pub struct DocumentReviser {
    llm: LlmClient,
    max_tokens: u32,
}

impl DocumentReviser {
    pub fn new(llm: LlmClient, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    pub fn request<S: AsRef<str>>(&self, paragraphs: &[S]) -> CompletionRequest {
        let prompt = format!(
            "Review each numbered paragraph below. Answer with one line per paragraph in the \
             form `<number>: <suggested revision>`, or `<number>: -` when it needs no change.\n\n{}",
            revision::numbered_paragraphs(paragraphs)
        );
        CompletionRequest::new(vec![
            ChatMessage::text(Role::System, REVIEW_SYSTEM_PROMPT),
            ChatMessage::text(Role::User, prompt),
        ])
        .with_max_tokens(self.max_tokens)
    }

    pub async fn suggest<S: AsRef<str> + Sync>(&self, paragraphs: &[S]) -> ZakaiResult<Vec<Suggestion>> {
        let reply = self.llm.complete(self.request(paragraphs)).await?;
        Ok(revision::parse_suggestions(&reply, paragraphs.len()))
    }

    /// Reads the document, asks for suggestions and returns the annotated copy.
    pub async fn revise(&self, file_name: &str, bytes: &[u8]) -> ZakaiResult<RevisedDocument> {
        let paragraphs = docx::read_paragraphs(bytes)?;
        if paragraphs.iter().all(|p| p.trim().is_empty()) {
            return Err(ZakaiError::Extraction(format!("{file_name} has no text to revise")));
        }

        let suggestions = self.suggest(&paragraphs).await?;
        let revised = revision::annotate(&paragraphs, &suggestions)?;
        info!(
            file = file_name,
            paragraphs = paragraphs.len(),
            suggestions = suggestions.len(),
            "Document revised"
        );
        Ok(RevisedDocument {
            file_name: revision::revised_file_name(file_name),
            bytes: revised,
            suggestions,
        })
    }
}
