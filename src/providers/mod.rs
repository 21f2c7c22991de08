use crate::chat::Role;
use crate::core::error::AssistantError;
use async_trait::async_trait;
use serde::Serialize;

pub mod base_client;
pub mod openai;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Remote completion service. Implementations make exactly one request per
/// call and report non-success statuses as [`AssistantError::Api`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<String, AssistantError>;
}
