//! Caller-facing chat API.
//!
//! Owns one conversation: its history, its focus product, and the
//! orchestrator that answers questions against the shared knowledge store.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use cuas_core::config::ChatConfig;
use cuas_core::ChatMessage;
use cuas_knowledge::KnowledgeStore;
use cuas_llm::TextGenerator;
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::history::ConversationHistory;
use crate::orchestrator::{ChatReply, ResponseOrchestrator};

/// A single conversation with the assistant.
///
/// Turns are serialized: a second `send_message` waits until the first has
/// appended its reply, so history always alternates question and answer.
pub struct ChatService {
    orchestrator: ResponseOrchestrator,
    store: Arc<KnowledgeStore>,
    history: Mutex<ConversationHistory>,
    focus: Mutex<Option<String>>,
    turn: tokio::sync::Mutex<()>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(
        store: Arc<KnowledgeStore>,
        generator: Arc<dyn TextGenerator>,
        readiness_timeout: Duration,
        config: ChatConfig,
    ) -> Self {
        Self {
            orchestrator: ResponseOrchestrator::new(Arc::clone(&store), generator, readiness_timeout),
            store,
            history: Mutex::new(ConversationHistory::new()),
            focus: Mutex::new(None),
            turn: tokio::sync::Mutex::new(()),
            config,
        }
    }

    /// Send a user message and wait for the assistant's reply.
    ///
    /// The user message is appended immediately; the reply is appended when
    /// it arrives unless the conversation was cleared in the meantime.
    pub async fn send_message(&self, text: &str) -> Result<ChatMessage, ChatError> {
        let (message, _) = self.send_message_with_outcome(text).await?;
        Ok(message)
    }

    /// Like [`send_message`](Self::send_message), also reporting how the reply was produced.
    pub async fn send_message_with_outcome(
        &self,
        text: &str,
    ) -> Result<(ChatMessage, ChatReply), ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let _turn = self.turn.lock().await;

        let focus = self.focus()?;
        let (window, epoch) = {
            let mut history = self.lock_history()?;
            let window = history.recent_window(self.config.history_window);
            history.append(ChatMessage::user(text));
            (window, history.epoch())
        };

        let reply = self
            .orchestrator
            .respond(text, focus.as_deref(), &window)
            .await;
        let message = ChatMessage::assistant(reply.text.clone());

        let mut history = self.lock_history()?;
        if history.epoch() == epoch {
            history.append(message.clone());
        } else {
            debug!("Conversation cleared during turn; reply not recorded");
        }

        Ok((message, reply))
    }

    /// Snapshot of the full conversation.
    ///
    /// A poisoned lock is recovered: history is append-only, so the log a
    /// panicking writer left behind is still well formed.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let history = self.history.lock().unwrap_or_else(|poisoned| {
            warn!("History lock poisoned; reading recovered messages");
            poisoned.into_inner()
        });
        history.all().to_vec()
    }

    /// Reset the conversation to the welcome message.
    pub fn clear_messages(&self) -> Result<(), ChatError> {
        self.lock_history()?.clear();
        info!("Conversation cleared");
        Ok(())
    }

    /// Names of all products in the knowledge base; empty until it loads.
    pub fn available_products(&self) -> Vec<String> {
        self.store.product_names()
    }

    /// Scope the conversation to a product, or remove the scope with `None`.
    ///
    /// Changing the focus clears the conversation so earlier answers about a
    /// different product are not replayed into new prompts.
    pub fn set_focus(&self, product: Option<String>) -> Result<(), ChatError> {
        let product = product
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        {
            let mut focus = self
                .focus
                .lock()
                .map_err(|e| ChatError::State(format!("focus lock poisoned: {}", e)))?;
            if *focus == product {
                return Ok(());
            }
            info!(from = ?*focus, to = ?product, "Focus product changed");
            *focus = product;
        }
        self.clear_messages()
    }

    pub fn focus(&self) -> Result<Option<String>, ChatError> {
        self.focus
            .lock()
            .map(|f| f.clone())
            .map_err(|e| ChatError::State(format!("focus lock poisoned: {}", e)))
    }

    fn lock_history(&self) -> Result<MutexGuard<'_, ConversationHistory>, ChatError> {
        self.history
            .lock()
            .map_err(|e| ChatError::State(format!("history lock poisoned: {}", e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
