//! Error types for the conversational interface.

use cuas_core::CuasError;

/// Errors surfaced to callers of [`crate::ChatService`].
///
/// Backend and knowledge base failures never appear here; they resolve to
/// displayable reply text instead.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("chat state unavailable: {0}")]
    State(String),
}

impl From<ChatError> for CuasError {
    fn from(err: ChatError) -> Self {
        CuasError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
        assert_eq!(
            ChatError::State("history lock poisoned".to_string()).to_string(),
            "chat state unavailable: history lock poisoned"
        );
    }

    #[test]
    fn test_chat_error_into_cuas_error() {
        let err: CuasError = ChatError::EmptyMessage.into();
        assert!(matches!(err, CuasError::Chat(_)));
    }
}
