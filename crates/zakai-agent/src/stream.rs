use serde::{Deserialize, Serialize};

/// Events emitted during a streaming completion.
///
/// The backend's reader task sends these over a bounded channel; the
/// response streamer is the only consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A chunk of text content from the assistant.
    TextDelta { text: String },

    /// The stream has finished successfully.
    Done,

    /// The transfer failed; no more events follow.
    Error { message: String },
}
