use thiserror::Error;

/// Top-level error type for the C-UAS assistant.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for CuasError` so that `?` works across crate
/// boundaries in the binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CuasError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Insight error: {0}")]
    Insight(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CuasError {
    fn from(err: toml::de::Error) -> Self {
        CuasError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CuasError {
    fn from(err: toml::ser::Error) -> Self {
        CuasError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CuasError {
    fn from(err: serde_json::Error) -> Self {
        CuasError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for C-UAS operations.
pub type Result<T> = std::result::Result<T, CuasError>;
