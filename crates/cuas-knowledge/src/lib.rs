//! Product knowledge base for the C-UAS assistant.
//!
//! The catalog is loaded once, asynchronously, from a file or URL and is
//! read-only afterwards. Consumers wait on a readiness signal instead of
//! polling the load state.

pub mod error;
pub mod source;
pub mod store;

pub use error::KnowledgeError;
pub use source::KnowledgeSource;
pub use store::{KnowledgeStore, LoadState};
