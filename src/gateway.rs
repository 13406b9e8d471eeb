use crate::image::parse_data_uri;
use crate::types::{ErrorKind, GatewayConfig};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;

/// Canned response served in mock mode. Three captions separated by blank
/// lines, each with a short label, like a real model answer.
pub const MOCK_RESPONSE: &str = "Playful vibes: Sun-kissed moments and good energy. \n\nSmile caption: \"Living for these golden hour feels!\" \n\nShort & sweet: \"Sun. Smiles. Repeat.\"";

/// Anything that can turn an image and a prompt into raw caption text.
///
/// Implementations own their retry and caching policy, if any; callers
/// invoke this once per user request.
pub trait CaptionGateway: Send + Sync {
    /// Request caption text for an image given as a `data:` URI.
    fn request_caption(
        &self,
        image_data_uri: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

/// Gateway backed by the Gemini `generateContent` API.
///
/// The HTTP client and configuration are injected; nothing is cached
/// between calls.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    client: Client,
    config: GatewayConfig,
}

impl GeminiGateway {
    pub fn new(client: Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl CaptionGateway for GeminiGateway {
    async fn request_caption(&self, image_data_uri: &str, prompt: &str) -> Result<String, GatewayError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            if self.config.mock {
                log::info!("No API key configured, serving mock caption");
                return Ok(MOCK_RESPONSE.to_string());
            }
            return Err(GatewayError::NotConfigured);
        };

        if prompt.trim().is_empty() {
            return Err(GatewayError::InvalidInput("prompt is empty".to_string()));
        }

        let body = build_request_body(image_data_uri, prompt)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        log::debug!("Requesting caption from {} ({})", self.config.endpoint, self.config.model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Connection(self.config.endpoint.clone(), e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            log::error!("Gemini returned HTTP {}: {}", status, text);
            return Err(GatewayError::ProviderError(status, text));
        }

        let response: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        response.into_text()
    }
}

/// Build the `generateContent` body: the prompt followed by the inline image.
fn build_request_body(image_data_uri: &str, prompt: &str) -> Result<serde_json::Value, GatewayError> {
    let image = parse_data_uri(image_data_uri)?;
    Ok(json!({
        "contents": [{
            "parts": [
                { "text": prompt },
                {
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                }
            ]
        }]
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Result<String, GatewayError> {
        let Some(content) = self.candidates.into_iter().next().and_then(|c| c.content) else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(GatewayError::InvalidResponse(reason));
        };

        Ok(content.parts.into_iter().filter_map(|p| p.text).collect())
    }
}

/// Errors that can occur while requesting a caption.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Server not configured: missing GEMINI_API_KEY")]
    NotConfigured,

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Failed to read image: {0}")]
    ImageRead(String),

    #[error("Cannot connect to Gemini at {0}: {1}")]
    Connection(String, String),

    #[error("Gemini returned HTTP {0}: {1}")]
    ProviderError(u16, String),

    #[error("Invalid response from Gemini: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::NotConfigured => ErrorKind::NotConfigured,
            GatewayError::InvalidInput(_) | GatewayError::ImageRead(_) => ErrorKind::InvalidInput,
            GatewayError::Connection(..)
            | GatewayError::ProviderError(..)
            | GatewayError::InvalidResponse(_) => ErrorKind::ProviderFailure,
        }
    }

    /// Message safe to show to an end user. Provider details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::ProviderFailure => "Failed to generate caption".to_string(),
            ErrorKind::NotConfigured | ErrorKind::InvalidInput => self.to_string(),
        }
    }
}
