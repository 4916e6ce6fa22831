//! Session state for one interactive ZakAI chat.
//!
//! The [`Transcript`] is the single source of truth for the conversation and
//! is replayed verbatim on every completion call. The [`Session`] owns it,
//! together with the uploaded document and any image awaiting its question.

/// Explicit session object and its state machine.
pub mod session;
/// Append-only, role-tagged message log.
pub mod transcript;

pub use session::{Attachment, PendingImage, Session, SessionState};
pub use transcript::Transcript;
