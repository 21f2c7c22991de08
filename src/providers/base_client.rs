use crate::core::error::AssistantError;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BaseApiClient {
    client: Client,
    endpoint: String,
}

impl BaseApiClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AssistantError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `payload` as JSON to `{endpoint}/{path}` with a bearer token.
    /// Non-2xx responses are turned into [`AssistantError::Api`].
    pub async fn send_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        api_key: &str,
        payload: &T,
    ) -> Result<Response, AssistantError> {
        let url = format!("{}/{}", self.endpoint, path);
        debug!(%url, "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AssistantError::Api {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            }),
        })
    }
}

/// Pull `error.message` out of an OpenAI-style error body, falling back to
/// the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(|m| m.as_str())
        .map(str::to_string);
    Some(message.unwrap_or_else(|| body.to_string()))
}
