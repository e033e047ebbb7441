//! OpenAI chat completions over HTTPS

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Request, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::http_client::{build_https_client, HyperClient};
use super::{ChatMessage, CompletionClient, CompletionError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 1500,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct OpenAiClient {
    client: HyperClient,
    endpoint: Uri,
    config: OpenAiConfig,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, CompletionError> {
        let base_url = sanitize_base_url(&config.base_url)?;
        let endpoint = format!("{}v1/chat/completions", base_url)
            .parse::<Uri>()
            .map_err(|e| CompletionError::Configuration(format!("invalid endpoint: {}", e)))?;

        Ok(Self {
            client: build_https_client(),
            endpoint,
            config,
        })
    }

    fn build_request(&self, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, api_key: &str, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
        let payload = self.build_request(messages);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| CompletionError::Configuration(format!("failed to encode request: {}", e)))?;

        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .body(Body::from(body))
            .map_err(|e| CompletionError::Transport(format!("failed to build request: {}", e)))?;

        tracing::debug!("POST {} (model {})", self.endpoint, self.config.model);

        let response = timeout(self.config.timeout, self.client.request(request))
            .await
            .map_err(|_| CompletionError::Transport("request timed out".to_string()))?
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = to_bytes(response.into_body())
            .await
            .map_err(|e| CompletionError::Transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!("Completion endpoint returned {}", status);
            return Err(CompletionError::Api(api_error_message(&bytes)));
        }

        parse_completion(&bytes)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Message from an `{"error": {"message": ...}}` body, or "Unknown error"
fn api_error_message(bytes: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(bytes)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// First choice's content, trimmed
fn parse_completion(bytes: &[u8]) -> Result<String, CompletionError> {
    let response: ChatCompletionResponse = serde_json::from_slice(bytes)
        .map_err(|e| CompletionError::Response(format!("failed to decode response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| CompletionError::Response("response contained no message".to_string()))
}

fn sanitize_base_url(input: &str) -> Result<String, CompletionError> {
    let mut base = input.trim().to_string();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(CompletionError::Configuration(
            "base URL must start with http:// or https://".to_string(),
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|e| CompletionError::Configuration(format!("invalid base URL: {}", e)))?;
    Ok(base)
}
