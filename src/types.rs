use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the Gemini model name.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Environment variable overriding the Gemini API endpoint.
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";
/// Set to `true` to serve a canned response when no API key is configured.
pub const MOCK_ENV: &str = "MOCK_CAPTION";

/// Configuration for the caption gateway.
///
/// Resolve once at startup (see [`GatewayConfig::from_env`]) and hand it to
/// [`GeminiGateway::new`](crate::gateway::GeminiGateway::new).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gemini API endpoint (e.g., "https://generativelanguage.googleapis.com")
    pub endpoint: String,
    /// Model name (e.g., "gemini-1.5-flash")
    pub model: String,
    /// API key. `None` means the gateway is not configured.
    pub api_key: Option<String>,
    /// Serve a canned response when no API key is set (default: false)
    pub mock: bool,
    /// Request timeout (default: 60s)
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            mock: false,
            timeout: Duration::from_secs(60),
        }
    }
}

impl GatewayConfig {
    /// Create a new config with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Read `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_ENDPOINT` and
    /// `MOCK_CAPTION` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.api_key = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty());
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint;
        }
        config.mock = lookup(MOCK_ENV).as_deref() == Some("true");
        config
    }

    /// Set the API endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Enable or disable the canned mock response.
    pub fn mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Category of a gateway failure, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No API key is configured.
    NotConfigured,
    /// The provider could not be reached or returned an error.
    ProviderFailure,
    /// The request itself was malformed.
    InvalidInput,
}

impl ErrorKind {
    /// HTTP status used when reporting this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotConfigured => 503,
            ErrorKind::ProviderFailure => 500,
            ErrorKind::InvalidInput => 400,
        }
    }
}

/// Body of a caption request: `{ "image": "data:...", "prompt": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRequest {
    /// Image as a `data:` URI
    pub image: String,
    pub prompt: String,
}

/// Body of a caption response: `{ "caption": "..." }` or `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptionResponse {
    Caption { caption: String },
    Error { error: String },
}

impl CaptionResponse {
    /// Build the response body and HTTP status for a gateway result.
    pub fn from_result(result: &Result<String, crate::gateway::GatewayError>) -> (u16, Self) {
        match result {
            Ok(caption) => (
                200,
                CaptionResponse::Caption {
                    caption: caption.clone(),
                },
            ),
            Err(e) => (
                e.kind().status_code(),
                CaptionResponse::Error {
                    error: e.public_message(),
                },
            ),
        }
    }

    /// The caption text, if this is a success body.
    pub fn caption(&self) -> Option<&str> {
        match self {
            CaptionResponse::Caption { caption } => Some(caption),
            CaptionResponse::Error { .. } => None,
        }
    }
}
