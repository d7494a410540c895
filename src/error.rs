//! Error types for the survey engine.
//!
//! Stale section references are deliberately NOT represented here: selection
//! titles that no longer resolve against the catalog are dropped silently
//! during merge (tolerant-read policy), never surfaced as errors.

use thiserror::Error;

/// Error type for the survey engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The generation service call failed (transport or service-side).
    #[error("Generation request failed: {0}")]
    Generation(String),

    /// The contextual-configuration extraction call failed. Never fatal to
    /// the main generation flow.
    #[error("Configuration extraction failed: {0}")]
    Extraction(String),

    /// Local submission/profile store errors.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport errors from the generation collaborators.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Create a generation error from any displayable cause.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create an extraction error from any displayable cause.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let err = EngineError::generation("connection refused");
        assert_eq!(err.to_string(), "Generation request failed: connection refused");
    }

    #[test]
    fn test_extraction_error_display() {
        let err = EngineError::extraction("empty response");
        assert_eq!(err.to_string(), "Configuration extraction failed: empty response");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io_err.into();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
