//! Conversation history with a rolling prompt window.

use cuas_core::ChatMessage;

/// First message of every conversation, and the only one left after a clear.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your C-UAS expert assistant. I can help you learn about counter-drone systems, compare products, and find the right solutions for your needs. What would you like to know?";

/// Append-only message log.
///
/// `epoch` increases on every clear so that a reply computed against an
/// older conversation can be recognised and dropped.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
    epoch: u64,
}

impl ConversationHistory {
    /// A conversation containing only the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            epoch: 0,
        }
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The last `n` messages (fewer if the history is shorter), oldest first.
    pub fn recent(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// The last `n` messages rendered as `User: ...` / `Assistant: ...` lines.
    pub fn recent_window(&self, n: usize) -> String {
        render_window(self.recent(n))
    }

    /// Reset to the welcome message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::assistant(WELCOME_MESSAGE));
        self.epoch += 1;
    }

    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Render messages as speaker-prefixed lines joined by newlines.
pub fn render_window(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.speaker(), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(n: usize) -> ConversationHistory {
        let mut history = ConversationHistory::new();
        for i in 0..n {
            if i % 2 == 0 {
                history.append(ChatMessage::user(format!("question {}", i)));
            } else {
                history.append(ChatMessage::assistant(format!("answer {}", i)));
            }
        }
        history
    }

    #[test]
    fn test_new_history_has_welcome() {
        let history = ConversationHistory::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.all()[0].text, WELCOME_MESSAGE);
        assert!(!history.all()[0].is_user);
    }

    #[test]
    fn test_append_preserves_order() {
        let history = history_with(3);
        let texts: Vec<&str> = history.all().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![WELCOME_MESSAGE, "question 0", "answer 1", "question 2"]);
    }

    #[test]
    fn test_recent_window_sizes() {
        for total in [0usize, 1, 5, 9, 10, 11, 25] {
            let history = history_with(total);
            for n in [0usize, 1, 3, 10, 40] {
                let expected = n.min(history.len());
                assert_eq!(history.recent(n).len(), expected);
                let window = history.recent_window(n);
                let lines = if window.is_empty() { 0 } else { window.lines().count() };
                assert_eq!(lines, expected, "total={} n={}", total, n);
            }
        }
    }

    #[test]
    fn test_recent_window_is_chronological_and_labelled() {
        let history = history_with(4);
        assert_eq!(
            history.recent_window(3),
            "User: question 0\nAssistant: answer 1\nUser: question 2"
        );
    }

    #[test]
    fn test_recent_window_does_not_mutate() {
        let history = history_with(6);
        let before = history.len();
        let _ = history.recent_window(2);
        assert_eq!(history.len(), before);
    }

    #[test]
    fn test_clear_leaves_only_welcome() {
        for total in [0usize, 1, 50] {
            let mut history = history_with(total);
            history.clear();
            assert_eq!(history.len(), 1);
            assert_eq!(history.all()[0].text, WELCOME_MESSAGE);
        }
    }

    #[test]
    fn test_clear_advances_epoch() {
        let mut history = ConversationHistory::new();
        assert_eq!(history.epoch(), 0);
        history.clear();
        history.clear();
        assert_eq!(history.epoch(), 2);
    }

    #[test]
    fn test_render_window_empty() {
        assert_eq!(render_window(&[]), "");
    }
}
