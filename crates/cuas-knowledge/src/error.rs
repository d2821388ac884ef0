use std::time::Duration;

use cuas_core::CuasError;
use thiserror::Error;

/// Errors from loading or waiting on the knowledge base.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge base: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch knowledge base: {0}")]
    Fetch(String),
    #[error("failed to parse knowledge base: {0}")]
    Parse(String),
    #[error("knowledge base not ready after {0:?}")]
    NotReady(Duration),
}

impl From<reqwest::Error> for KnowledgeError {
    fn from(err: reqwest::Error) -> Self {
        KnowledgeError::Fetch(err.to_string())
    }
}

impl From<KnowledgeError> for CuasError {
    fn from(err: KnowledgeError) -> Self {
        CuasError::Knowledge(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_error_display() {
        let err = KnowledgeError::Parse("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "failed to parse knowledge base: expected value at line 1"
        );

        let err = KnowledgeError::NotReady(Duration::from_millis(250));
        assert_eq!(err.to_string(), "knowledge base not ready after 250ms");
    }

    #[test]
    fn test_knowledge_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: KnowledgeError = io_err.into();
        assert!(matches!(err, KnowledgeError::Io(_)));
    }

    #[test]
    fn test_knowledge_error_into_cuas_error() {
        let err: CuasError = KnowledgeError::Fetch("404".to_string()).into();
        assert!(matches!(err, CuasError::Knowledge(_)));
        assert!(err.to_string().contains("404"));
    }
}
