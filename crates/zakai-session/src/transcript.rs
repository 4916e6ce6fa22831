use serde::Serialize;
use uuid::Uuid;
use zakai_core::{Message, Role, ZakaiError, ZakaiResult};

/// Ordered, append-only log of the messages of one session.
///
/// Index 0 always holds the single system message the transcript was seeded
/// with. Everything after it is appended in chronological order and never
/// mutated, reordered, or removed.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    session_id: Uuid,
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript seeded with its system message.
    pub fn new(session_id: Uuid, system_prompt: impl Into<String>) -> Self {
        Self {
            session_id,
            messages: vec![Message::system(system_prompt, session_id)],
        }
    }

    /// Appends a user or assistant message.
    ///
    /// System messages and messages from another session are rejected.
    pub fn push(&mut self, message: Message) -> ZakaiResult<()> {
        if message.role == Role::System {
            return Err(ZakaiError::Session(
                "the system message is seeded once and cannot be appended".to_string(),
            ));
        }
        if message.session_id != self.session_id {
            return Err(ZakaiError::Session(format!(
                "message {} belongs to session {}, not {}",
                message.id, message.session_id, self.session_id
            )));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Every message, system message first, in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The seeded system message.
    pub fn system(&self) -> &Message {
        &self.messages[0]
    }

    /// Messages after the system message.
    pub fn history(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// The most recent message (the system message on a fresh transcript).
    pub fn last(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }

    /// Total number of messages, including the system message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system message is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// The session this transcript belongs to.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_system_message() {
        let sid = Uuid::new_v4();
        let transcript = Transcript::new(sid, "You are a helpful assistant");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.system().role, Role::System);
        assert_eq!(transcript.system().content, "You are a helpful assistant");
        assert!(transcript.history().is_empty());
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_push_rejects_second_system_message() {
        let sid = Uuid::new_v4();
        let mut transcript = Transcript::new(sid, "sys");
        let err = transcript.push(Message::system("again", sid)).unwrap_err();
        assert!(matches!(err, ZakaiError::Session(_)));
        assert_eq!(transcript.count_role(Role::System), 1);
    }

    #[test]
    fn test_push_rejects_foreign_session() {
        let mut transcript = Transcript::new(Uuid::new_v4(), "sys");
        let result = transcript.push(Message::user("hi", Uuid::new_v4()));
        assert!(result.is_err());
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let sid = Uuid::new_v4();
        let mut transcript = Transcript::new(sid, "sys");
        transcript.push(Message::user("one", sid)).unwrap();
        transcript.push(Message::assistant("two", sid)).unwrap();
        transcript.push(Message::user("three", sid)).unwrap();

        let contents: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["sys", "one", "two", "three"]);
        assert_eq!(transcript.last().content, "three");
    }
}
