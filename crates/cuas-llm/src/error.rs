//! Error types for text-generation backends.

use cuas_core::CuasError;

/// Errors returned by a [`crate::TextGenerator`].
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("backend returned no text")]
    EmptyResponse,
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Request(err.to_string())
    }
}

impl From<LlmError> for CuasError {
    fn from(err: LlmError) -> Self {
        CuasError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Request("connection reset".to_string());
        assert_eq!(err.to_string(), "request failed: connection reset");

        let err = LlmError::Status {
            status: 429,
            body: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned 429: quota");

        assert_eq!(LlmError::EmptyResponse.to_string(), "backend returned no text");
    }

    #[test]
    fn test_llm_error_into_cuas_error() {
        let err: CuasError = LlmError::InvalidResponse("no candidates".to_string()).into();
        assert!(matches!(err, CuasError::Backend(_)));
        assert!(err.to_string().contains("no candidates"));
    }
}
