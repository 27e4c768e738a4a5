//! Error types for askdocs.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application, including configuration, I/O, LLM, extraction,
//! knowledge and prompt errors.

use thiserror::Error;

/// Unified error type for askdocs.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential is absent from the environment
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM provider could not be reached or rejected the credential
    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    /// File decoding and text extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Chunking, embedding and vector index errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = AppError::MissingCredential("GEMINI_API_KEY".to_string());
        assert_eq!(err.to_string(), "Missing credential: GEMINI_API_KEY is not set");
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse: Result<serde_yaml::Value, _> = serde_yaml::from_str("key: [unclosed");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
