//! Chat orchestration for ZakAI.
//!
//! [`SessionController`] takes one [`UserAction`] at a time, folds it into the
//! session transcript and talks to an OpenAI-compatible API through
//! [`LlmClient`]. Streamed replies are split into text and math segments by
//! the [`ResponseStreamer`] and drawn on a [`RenderSurface`].

pub mod backends;
pub mod config;
pub mod context;
pub mod controller;
pub mod imagegen;
pub mod intent;
pub mod llm;
pub mod reviser;
pub mod stream;
pub mod streamer;
pub mod surface;
pub mod vision;

pub use backends::LlmBackend;
pub use config::{ChatConfig, IntentConfig, LlmProvider, ModelConfig, StreamConfig};
pub use context::ContextWindow;
pub use controller::{SessionController, UserAction};
pub use imagegen::ImageGenerator;
pub use intent::{Intent, IntentClassifier};
pub use llm::{ChatContent, ChatMessage, CompletionRequest, ContentPart, ImageRequest, LlmClient};
pub use reviser::DocumentReviser;
pub use stream::StreamEvent;
pub use streamer::{split_math, ReplyBuffer, ResponseStreamer, Segment, StreamedReply};
pub use surface::RenderSurface;
pub use vision::ImageAnalyzer;
