#![allow(clippy::unwrap_used, clippy::expect_used)]

use uuid::Uuid;
use zakai_core::*;

// ---------------------------------------------------------------------------
// 1. Message serialization roundtrip
// ---------------------------------------------------------------------------

#[test]
fn message_serialization_roundtrip() {
    let session_id = Uuid::new_v4();
    let msg = Message::user("📂 File uploaded: report.pdf", session_id)
        .with_metadata("file_name", serde_json::json!("report.pdf"));

    let json = serde_json::to_string(&msg).unwrap();
    let deserialized: Message = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized.id, msg.id);
    assert_eq!(deserialized.role, Role::User);
    assert_eq!(deserialized.content, "📂 File uploaded: report.pdf");
    assert_eq!(deserialized.session_id, session_id);
    assert_eq!(deserialized.timestamp, msg.timestamp);
    assert_eq!(
        deserialized.metadata.get("file_name"),
        Some(&serde_json::json!("report.pdf"))
    );
}

// ---------------------------------------------------------------------------
// 2. Metadata defaults when absent from the wire
// ---------------------------------------------------------------------------

#[test]
fn message_without_metadata_deserializes() {
    let json = serde_json::json!({
        "id": Uuid::new_v4(),
        "role": "assistant",
        "content": "hi",
        "session_id": Uuid::new_v4(),
        "timestamp": "2026-01-01T00:00:00Z",
    });
    let msg: Message = serde_json::from_value(json).unwrap();
    assert_eq!(msg.role, Role::Assistant);
    assert!(msg.metadata.is_empty());
}

// ---------------------------------------------------------------------------
// 3. Error variants display their subsystem
// ---------------------------------------------------------------------------

#[test]
fn error_variants_display_subsystem() {
    let cases = [
        (ZakaiError::Agent("x".into()), "Agent error: x"),
        (ZakaiError::Http("x".into()), "HTTP error: x"),
        (ZakaiError::Session("x".into()), "Session error: x"),
        (ZakaiError::Config("x".into()), "Config error: x"),
        (ZakaiError::Render("x".into()), "Render error: x"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn json_error_converts() {
    let parsed: Result<Message, _> = serde_json::from_str("{not json");
    let err: ZakaiError = parsed.unwrap_err().into();
    assert!(matches!(err, ZakaiError::Json(_)));
}
