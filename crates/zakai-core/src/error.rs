/// Top-level error type for ZakAI.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum ZakaiError {
    /// An error originating from the session controller or a model call.
    #[error("Agent error: {0}")]
    Agent(String),

    /// An error from an outbound HTTP request (e.g. a completion API call).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A violated transcript or session invariant.
    #[error("Session error: {0}")]
    Session(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An uploaded document could not be turned into text or rewritten.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The rendering surface could not display or deliver output.
    #[error("Render error: {0}")]
    Render(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`ZakaiError`].
pub type ZakaiResult<T> = Result<T, ZakaiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_display() {
        let err = ZakaiError::Extraction("corrupt zip".to_string());
        assert_eq!(err.to_string(), "Extraction failed: corrupt zip");
    }

    #[test]
    fn test_io_error_conversion() {
        fn open() -> ZakaiResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(matches!(err, ZakaiError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
