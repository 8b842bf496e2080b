use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{classify_status, request_error, wire_messages, LlmClient, WireMessage};
use crate::error::BackendError;
use crate::types::Turn;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    seed: u64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Hosted backend speaking the OpenAI chat-completions protocol
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiClient {
    /// Client for `model` against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: None,
        }
    }

    /// Points the client at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the HTTP client with one that gives up after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, BackendError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn query(&self, turns: &[Turn], seed: u64) -> Result<String, BackendError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: wire_messages(turns),
            seed,
        };

        log::debug!("POST {} ({} messages)", self.endpoint(), request.messages.len());
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &headers, body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::MalformedResponse("response contained no choices".into()))?;
        choice
            .message
            .content
            .ok_or_else(|| BackendError::MalformedResponse("choice had no content".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
