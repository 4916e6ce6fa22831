//! Core types and error definitions for ZakAI.
//!
//! This crate provides the foundational types shared across all ZakAI crates:
//! the unified error type and the role-tagged chat message.
//!
//! # Main types
//!
//! - [`ZakaiError`] — Unified error enum for all ZakAI subsystems.
//! - [`ZakaiResult`] — Convenience alias for `Result<T, ZakaiError>`.
//! - [`Role`] — Message role (system, user, assistant).
//! - [`Message`] — A single message within a chat transcript.

/// Error type shared by every ZakAI crate.
pub mod error;
/// Role-tagged chat messages.
pub mod message;

pub use error::{ZakaiError, ZakaiResult};
pub use message::{Message, Role};
