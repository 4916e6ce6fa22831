use crate::transcript::Transcript;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use zakai_core::{Message, ZakaiError, ZakaiResult};

/// Where the session is in handling the current user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Between interactions.
    Idle,
    /// The surface is waiting for the next user action.
    AwaitingUserInput,
    /// An uploaded image is waiting for the question to ask about it.
    AwaitingImagePrompt,
    /// Handling a file upload.
    FileBranch,
    /// Analyzing an uploaded image against its question.
    ImageBranch,
    /// Handling a plain text submission.
    TextBranch,
    /// Consuming a streamed completion.
    StreamingReply,
}

impl SessionState {
    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, AwaitingUserInput)
                | (AwaitingUserInput, FileBranch | ImageBranch | TextBranch | Idle)
                | (AwaitingImagePrompt, FileBranch | ImageBranch | Idle)
                | (FileBranch, Idle | AwaitingImagePrompt)
                | (ImageBranch, Idle | AwaitingImagePrompt)
                | (TextBranch, StreamingReply | Idle)
                | (StreamingReply, Idle)
        )
    }

    /// States in which the session accepts a new user action.
    pub fn accepts_input(self) -> bool {
        matches!(
            self,
            SessionState::Idle | SessionState::AwaitingUserInput | SessionState::AwaitingImagePrompt
        )
    }
}

/// The most recently uploaded document, kept for the revision branch.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Name as uploaded, extension included.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Wraps an uploaded file.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Only `.docx` files can be revised.
    pub fn is_docx(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".docx")
    }
}

/// An uploaded image awaiting its question.
#[derive(Debug, Clone)]
pub struct PendingImage {
    /// Name as uploaded.
    pub file_name: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type used for the data URL, e.g. `image/png`.
    pub mime: String,
}

/// One interactive chat session.
///
/// Constructed at session start, passed by `&mut` into every controller call,
/// dropped when the session ends. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session identifier, shared by every message in the transcript.
    pub id: Uuid,
    transcript: Transcript,
    /// The last document uploaded, if any.
    pub attachment: Option<Attachment>,
    /// An uploaded image that has not been asked about yet.
    pub pending_image: Option<PendingImage>,
    state: SessionState,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
    /// When a message was last appended.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Starts an idle session whose transcript holds only the system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        Self {
            id,
            transcript: Transcript::new(id, system_prompt),
            attachment: None,
            pending_image: None,
            state: SessionState::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read-only view of the conversation.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Appends a message and bumps `updated_at`.
    pub fn add_message(&mut self, message: Message) -> ZakaiResult<()> {
        self.transcript.push(message)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Appends a user message built for this session.
    pub fn add_user(&mut self, content: impl Into<String>) -> ZakaiResult<()> {
        self.add_message(Message::user(content, self.id))
    }

    /// Appends an assistant message built for this session.
    pub fn add_assistant(&mut self, content: impl Into<String>) -> ZakaiResult<()> {
        self.add_message(Message::assistant(content, self.id))
    }

    /// Number of messages, the system prompt included.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    /// Current state machine position.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Moves the state machine, rejecting transitions it does not allow.
    pub fn transition(&mut self, next: SessionState) -> ZakaiResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(ZakaiError::Session(format!(
                "invalid transition {:?} -> {:?}",
                self.state, next
            )));
        }
        debug!(session_id = %self.id, from = ?self.state, to = ?next, "Session transition");
        self.state = next;
        Ok(())
    }

    /// Returns to the resting state after an action, whatever happened.
    ///
    /// A session with an image still waiting for its question rests in
    /// [`SessionState::AwaitingImagePrompt`], otherwise in [`SessionState::Idle`].
    pub fn settle(&mut self) {
        self.state = if self.pending_image.is_some() {
            SessionState::AwaitingImagePrompt
        } else {
            SessionState::Idle
        };
    }
}
