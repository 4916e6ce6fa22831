pub mod openai;

use crate::llm::{CompletionRequest, ImageRequest};
use crate::stream::StreamEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use zakai_core::ZakaiResult;

/// Trait for LLM provider backends.
///
/// The session controller only talks to the hosted API through this trait,
/// so tests can script a backend without a network.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Non-streaming chat completion; resolves to the reply text.
    async fn complete(&self, request: CompletionRequest) -> ZakaiResult<String>;

    /// Streaming chat completion.
    ///
    /// Returns a receiver for stream events and a join handle that resolves
    /// to the full reply text.
    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> ZakaiResult<(mpsc::Receiver<StreamEvent>, JoinHandle<ZakaiResult<String>>)>;

    /// Image generation; resolves to the URL of the first produced image.
    async fn generate_image(&self, request: ImageRequest) -> ZakaiResult<String>;
}
