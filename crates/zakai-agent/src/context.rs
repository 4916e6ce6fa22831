use crate::llm::ChatMessage;
use zakai_session::Transcript;

/// Builds the request view of a transcript for a completion call.
///
/// The view is the system message followed by the history in insertion
/// order. With a cap, only the newest `max_messages` history entries are
/// sent; the transcript is never trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextWindow {
    max_messages: Option<usize>,
}

impl ContextWindow {
    /// `None` sends the whole history.
    pub fn new(max_messages: Option<usize>) -> Self {
        Self { max_messages }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn build(&self, transcript: &Transcript) -> Vec<ChatMessage> {
        let history = transcript.history();
        let skip = match self.max_messages {
            Some(max) => history.len().saturating_sub(max),
            None => 0,
        };

        let mut messages = Vec::with_capacity(history.len() - skip + 1);
        messages.push(ChatMessage::from(transcript.system()));
        messages.extend(history[skip..].iter().map(ChatMessage::from));
        messages
    }

    /// Rough token estimation (4 chars ≈ 1 token).
    pub fn estimated_tokens(&self, transcript: &Transcript) -> usize {
        self.build(transcript)
            .iter()
            .map(|m| m.text_content().len() / 4)
            .sum()
    }
}
