use super::{CompletionProvider, CompletionRequest, Turn};
use crate::core::error::AssistantError;
use crate::providers::base_client::BaseApiClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

const COMPLETIONS_PATH: &str = "chat/completions";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: BaseApiClient,
}

impl OpenAIProvider {
    pub fn with_endpoint(endpoint: &str) -> Result<Self, AssistantError> {
        Ok(Self {
            client: BaseApiClient::new(endpoint)?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(
        &self,
        credential: &str,
        request: &CompletionRequest,
    ) -> Result<String, AssistantError> {
        let payload = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .send_request(COMPLETIONS_PATH, credential, &payload)
            .await?;
        info!(
            endpoint = self.client.endpoint(),
            status = response.status().as_u16(),
            model = %request.model,
            "completion received"
        );

        let response_body: String = response.text().await?;
        first_choice(&response_body)
    }
}

fn first_choice(body: &str) -> Result<String, AssistantError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AssistantError::Serialization("No choices in API response".to_string()))
}
