use cuas_core::CuasError;
use thiserror::Error;

/// Errors that can occur while gathering review data.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid review data: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Parse(err.to_string())
    }
}

impl From<InsightError> for CuasError {
    fn from(err: InsightError) -> Self {
        CuasError::Insight(err.to_string())
    }
}
