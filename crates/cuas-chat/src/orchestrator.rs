//! Response orchestration: readiness wait, prompt assembly, backend call.

use std::sync::Arc;
use std::time::Duration;

use cuas_knowledge::KnowledgeStore;
use cuas_llm::TextGenerator;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::context::ContextBuilder;

/// Reply text when the backend fails or returns nothing usable.
pub const APOLOGY: &str =
    "I apologize, but I encountered an error while processing your question. Please try again.";

/// Reply text when the knowledge base does not become ready in time.
pub const STILL_LOADING: &str =
    "I'm still loading the knowledge base. Please try again in a moment.";

const FOOTER: &str = "Instructions: Answer the current question using only the knowledge base above. \
Be concise: at most 2-3 sentences unless the user asks for detailed specifications. \
Use a professional tone.";

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOutcome {
    /// Text came from the backend.
    Answered,
    /// The backend call failed; text is [`APOLOGY`].
    BackendFailed,
    /// The knowledge base never became ready; text is [`STILL_LOADING`].
    KnowledgeUnavailable,
}

/// A displayable reply. Always carries text, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub outcome: ReplyOutcome,
}

impl ChatReply {
    fn answered(text: String) -> Self {
        Self {
            text,
            outcome: ReplyOutcome::Answered,
        }
    }

    fn backend_failed() -> Self {
        Self {
            text: APOLOGY.to_string(),
            outcome: ReplyOutcome::BackendFailed,
        }
    }

    fn knowledge_unavailable() -> Self {
        Self {
            text: STILL_LOADING.to_string(),
            outcome: ReplyOutcome::KnowledgeUnavailable,
        }
    }

    pub fn is_answer(&self) -> bool {
        self.outcome == ReplyOutcome::Answered
    }
}

// =============================================================================
// ResponseOrchestrator
// =============================================================================

/// Turns a question into a reply.
///
/// Stateless between calls: it reads the knowledge store and never touches
/// conversation history. Each call makes at most one backend request.
pub struct ResponseOrchestrator {
    store: Arc<KnowledgeStore>,
    generator: Arc<dyn TextGenerator>,
    context: ContextBuilder,
    readiness_timeout: Duration,
}

impl ResponseOrchestrator {
    pub fn new(
        store: Arc<KnowledgeStore>,
        generator: Arc<dyn TextGenerator>,
        readiness_timeout: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            context: ContextBuilder,
            readiness_timeout,
        }
    }

    /// Answer `question`.
    ///
    /// `history_window` is the rendered prior conversation (see
    /// [`crate::history::ConversationHistory::recent_window`]); pass an empty
    /// string for a fresh conversation. Never fails: every error path
    /// resolves to a fixed reply text.
    pub async fn respond(
        &self,
        question: &str,
        focus: Option<&str>,
        history_window: &str,
    ) -> ChatReply {
        let state = match self.store.wait_ready(self.readiness_timeout).await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Answering without knowledge base");
                return ChatReply::knowledge_unavailable();
            }
        };
        debug!(?state, focus = ?focus, "Knowledge base ready");

        let prompt = self.build_prompt(question, focus, history_window);

        match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    backend = self.generator.name(),
                    prompt_chars = prompt.chars().count(),
                    reply_chars = text.chars().count(),
                    "Generated reply"
                );
                ChatReply::answered(text.trim().to_string())
            }
            Ok(_) => {
                error!(backend = self.generator.name(), "Backend returned empty reply");
                ChatReply::backend_failed()
            }
            Err(e) => {
                error!(backend = self.generator.name(), error = %e, "Backend call failed");
                ChatReply::backend_failed()
            }
        }
    }

    /// Assemble the full prompt for a question.
    ///
    /// Pure with respect to its arguments and the store contents.
    pub fn build_prompt(&self, question: &str, focus: Option<&str>, history_window: &str) -> String {
        let mut prompt = self.context.build(&self.store, focus);

        prompt.push_str("\nKnowledge Base:\n");
        prompt.push_str(&self.store.snapshot_json());
        prompt.push('\n');

        if !history_window.is_empty() {
            prompt.push_str("\nPrevious Conversation:\n");
            prompt.push_str(history_window);
            prompt.push('\n');
        }

        prompt.push_str("\nCurrent Question: ");
        prompt.push_str(question);
        prompt.push_str("\n\n");
        prompt.push_str(FOOTER);
        prompt
    }
}

// =============================================================================
// Tests
// =============================================================================
