//! Error types for the Scout assistant.
//!
//! One enum covers every failure category in the pipeline. Most of these are
//! caught at the component boundary and turned into a degraded answer; the
//! variants exist so logs and the turn handler can say what went wrong.

use thiserror::Error;

/// Unified error type for Scout.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request to an external service could not be completed
    #[error("Network error: {0}")]
    Network(String),

    /// A response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The language model could not be reached or refused the request
    #[error("LLM error: {0}")]
    Llm(String),

    /// A search produced nothing usable
    #[error("Search error: {0}")]
    Search(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Rejected user input (e.g. an empty question)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

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
    fn test_error_display() {
        let err = AppError::Llm("connection refused".to_string());
        assert_eq!(err.to_string(), "LLM error: connection refused");

        let err = AppError::Other("plain".to_string());
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
