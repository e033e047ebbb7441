//! Chat completion client used to generate content

mod http_client;
pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use openai::{OpenAiClient, OpenAiConfig};

/// Environment variable read to pre-fill the API key field
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

/// Failure of a completion call. The display string is what the user sees.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Client not configured: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("OpenAI API Error: {0}")]
    Api(String),

    #[error("Unexpected response: {0}")]
    Response(String),
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `messages` and return the generated text, trimmed
    async fn complete(&self, api_key: &str, messages: Vec<ChatMessage>) -> Result<String, CompletionError>;
}
