//! Text-generation backends.
//!
//! The assistant treats generation as an opaque `prompt -> text` call that
//! may fail. [`GeminiClient`] talks to the Google generative language API;
//! [`MockGenerator`] returns scripted replies for tests and offline runs.

pub mod error;
pub mod gemini;
pub mod generator;
pub mod mock;

pub use error::LlmError;
pub use gemini::GeminiClient;
pub use generator::{check_backend, TextGenerator, CHECK_PROMPT};
pub use mock::MockGenerator;
