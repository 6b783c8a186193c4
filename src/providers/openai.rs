use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for OpenAI-compatible chat-completion endpoints
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as a bearer token
    api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`
    base_url: String,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Chat message object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl OpenAIRequest {
    /// Create a new request with temperature 0
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token limit
    pub fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat completion response.
///
/// Only `choices[0].message.content` is interpreted; everything else is kept
/// so the whole body can be handed back when the expected shape is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<OpenAIChoice>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single completion choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<OpenAIMessage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message of a completion choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OpenAIResponse {
    /// Build a response carrying a single assistant message
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            choices: Some(vec![OpenAIChoice {
                message: Some(OpenAIMessage {
                    role: Some("assistant".to_string()),
                    content: Some(content.into()),
                    extra: Map::new(),
                }),
                extra: Map::new(),
            }]),
            extra: Map::new(),
        }
    }
}

impl OpenAI {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.completions_url();
        debug!("POST {} (model {}, {} messages)", url, request.model, request.messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if status.is_client_error() || status.is_server_error() {
            error!("API error ({}): {}", status, body);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str::<OpenAIResponse>(&body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, body)))
    }

    fn extract_text(response: &Self::Response) -> String {
        match response.choices.as_deref() {
            Some([first, ..]) => first
                .message
                .as_ref()
                .and_then(|m| m.content.clone())
                .unwrap_or_default(),
            // Unexpected shape: hand back the raw body instead of failing
            _ => serde_json::to_string(response).unwrap_or_default(),
        }
    }
}
