//! Conversational assistant for C-UAS products.
//!
//! Builds grounded prompts from the knowledge base and recent conversation,
//! submits them to a text-generation backend, and keeps the chat history.

pub mod context;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod service;

pub use context::ContextBuilder;
pub use error::ChatError;
pub use history::{ConversationHistory, WELCOME_MESSAGE};
pub use orchestrator::{ChatReply, ReplyOutcome, ResponseOrchestrator};
pub use service::ChatService;
