use crate::llm::{ChatContent, ChatMessage, CompletionRequest, ContentPart, ImageUrl, LlmClient};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{info, warn};
use zakai_core::{Role, ZakaiResult};

/// Instruction sent with every image question.
pub const VISION_SYSTEM_PROMPT: &str = "You analyze image contents.";
/// Prefix of the reply returned when the analysis fails.
pub const ERROR_PREFIX: &str = "Error analyzing image: ";

/// Whether `text` is a failure reply from [`ImageAnalyzer::analyze`].
pub fn is_error_reply(text: &str) -> bool {
    text.starts_with("Error")
}

/// Asks a vision-capable model questions about an image.
#[derive(Clone)]
pub struct ImageAnalyzer {
    llm: LlmClient,
    max_tokens: u32,
}

impl ImageAnalyzer {
    pub fn new(llm: LlmClient, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Builds the vision request: the question and the image as a data URL.
    pub fn request(&self, bytes: &[u8], mime: &str, question: &str) -> CompletionRequest {
        let data_url = format!("data:{mime};base64,{}", STANDARD.encode(bytes));
        CompletionRequest::new(vec![
            ChatMessage::text(Role::System, VISION_SYSTEM_PROMPT),
            ChatMessage {
                role: Role::User,
                content: ChatContent::Parts(vec![
                    ContentPart::Text {
                        text: question.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: data_url,
                            detail: "high".into(),
                        },
                    },
                ]),
            },
        ])
        .with_max_tokens(self.max_tokens)
    }

    /// The model's answer, or the error that prevented one.
    pub async fn try_analyze(&self, bytes: &[u8], mime: &str, question: &str) -> ZakaiResult<String> {
        info!(mime, bytes = bytes.len(), "Analyzing image");
        self.llm.complete(self.request(bytes, mime, question)).await
    }

    /// The model's answer. Failures come back as an
    /// `Error analyzing image: <reason>` string, never as an error.
    pub async fn analyze(&self, bytes: &[u8], mime: &str, question: &str) -> String {
        match self.try_analyze(bytes, mime, question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Image analysis failed");
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }
}
