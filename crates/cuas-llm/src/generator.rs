use async_trait::async_trait;
use tracing::info;

use crate::error::LlmError;

/// A black-box text completion service.
///
/// Given a prompt, returns generated text or fails. Implementations make
/// exactly one attempt per call; callers decide what a failure means.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Short identifier used in log fields.
    fn name(&self) -> &str;
}

/// Prompt sent by [`check_backend`].
pub const CHECK_PROMPT: &str = "Say hello world";

/// Send one short prompt to confirm the backend answers and accepts its key.
///
/// Returns the trimmed reply. A blank reply counts as a failure.
pub async fn check_backend(generator: &dyn TextGenerator) -> Result<String, LlmError> {
    let reply = generator.generate(CHECK_PROMPT).await?;
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    info!(backend = generator.name(), "Backend check passed");
    Ok(reply.to_string())
}
