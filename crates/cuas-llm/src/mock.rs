//! Scripted generator for tests and offline runs.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::generator::TextGenerator;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// Generator that returns a fixed reply and records every prompt it sees.
///
/// Identical prompts always produce identical output, so tests can assert on
/// both what was sent and what came back.
#[derive(Debug)]
pub struct MockGenerator {
    reply: MockReply,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Always succeed with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    /// Always fail with a request error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Fail(message.into()))
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(LlmError::Request(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_replying_records_prompts() {
        let generator = MockGenerator::replying("ok");
        assert_eq!(generator.generate("first").await.unwrap(), "ok");
        assert_eq!(generator.generate("second").await.unwrap(), "ok");
        assert_eq!(generator.prompts(), vec!["first", "second"]);
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_returns_request_error() {
        let generator = MockGenerator::failing("boom");
        let err = generator.generate("x").await.unwrap_err();
        assert!(matches!(err, LlmError::Request(ref m) if m == "boom"));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_delay_still_replies() {
        let generator = MockGenerator::replying("late").with_delay(Duration::from_millis(20));
        let started = std::time::Instant::now();
        assert_eq!(generator.generate("x").await.unwrap(), "late");
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_arc_dyn_dispatch() {
        let generator: Arc<dyn TextGenerator> = Arc::new(MockGenerator::replying("via arc"));
        assert_eq!(generator.generate("p").await.unwrap(), "via arc");
        assert_eq!(generator.name(), "mock");
    }
}
