use crate::llm::{ImageRequest, LlmClient};
use tracing::info;
use zakai_core::ZakaiResult;

/// Turns a text prompt into a generated image URL.
#[derive(Clone)]
pub struct ImageGenerator {
    llm: LlmClient,
}

impl ImageGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Submits `prompt` verbatim for one 1024x1024 image.
    pub async fn generate(&self, prompt: &str) -> ZakaiResult<String> {
        let url = self.llm.generate_image(ImageRequest::new(prompt)).await?;
        info!(url = %url, "Image generated");
        Ok(url)
    }
}
