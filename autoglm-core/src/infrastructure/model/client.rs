//! OpenAI-compatible chat completions client

use super::types::{ChatMessage, ModelError};
use crate::types::ModelConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const MAX_TOKENS: u32 = 3000;

/// Anything that can answer a chat turn.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn endpoint(&self) -> &str;

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, ModelError>;
}

#[derive(Clone)]
pub struct OpenAiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    http: Client,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig, timeout: Duration) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ModelError::ClientBuild)?;
        Ok(Self {
            endpoint: config.base_url.trim().to_string(),
            model: config.model_name.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            http,
        })
    }

    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, ModelError> {
        let url = self.build_url(CHAT_COMPLETIONS_PATH);
        info!(
            model = self.model.as_str(),
            messages = messages.len(),
            "Sending request to model endpoint"
        );

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            stream: false,
        };

        let mut request = self.http.post(&url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response: ChatCompletionResponse = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.endpoint, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.endpoint, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.endpoint, e))?;
        debug!("Received response from model endpoint");

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| ModelError::invalid_response(&self.endpoint, "missing content"))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: Option<ChatCompletionMessage>,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}
