//! Google generative language API client.

use std::time::Duration;

use async_trait::async_trait;
use cuas_core::config::BackendConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::generator::TextGenerator;

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// `generateContent` client for a single Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from backend settings.
    ///
    /// A missing key is not an error here: requests will be rejected by the
    /// API and surface as failed generations.
    pub fn new(config: &BackendConfig) -> Result<Self, LlmError> {
        if !config.has_api_key() {
            warn!("Gemini API key not configured. Set GEMINI_API_KEY or backend.api_key.");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint_for(&config.base_url, &config.model),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling generateContent");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        extract_text(&body)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn endpoint_for(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Pull the generated text out of a `generateContent` response body.
///
/// All text parts of the first candidate are concatenated.
fn extract_text(body: &str) -> Result<String, LlmError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_for_strips_trailing_slash() {
        assert_eq!(
            endpoint_for("https://generativelanguage.googleapis.com/", "gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_client_uses_configured_model() {
        let config = BackendConfig {
            base_url: "http://localhost:9999".to_string(),
            model: "test-model".to_string(),
            ..BackendConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.name(), "test-model");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/test-model:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "The Roadrunner "}, {"text": "is reusable."}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(extract_text(body).unwrap(), "The Roadrunner is reusable.");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let err = extract_text(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_extract_text_blocked_candidate_is_empty() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(extract_text(body), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_extract_text_malformed_json() {
        assert!(matches!(
            extract_text("<html>bad gateway</html>"),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_unreachable_host_is_request_error() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
            ..BackendConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_)));
    }
}
