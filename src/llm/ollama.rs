use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{classify_status, request_error, wire_messages, LlmClient, WireMessage};
use crate::error::BackendError;
use crate::types::Turn;

pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:latest";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    seed: u64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<WireMessage>,
    #[serde(default)]
    error: Option<String>,
}

/// Locally-resident model served by Ollama
pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaClient {
    /// Client for `model` on the default local Ollama host
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            host: DEFAULT_HOST.to_string(),
            model: model.into(),
            timeout: None,
        }
    }

    /// Points the client at another Ollama server
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
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
        format!("{}/api/chat", self.host)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn query(&self, turns: &[Turn], seed: u64) -> Result<String, BackendError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: wire_messages(turns),
            stream: false,
            options: ChatOptions { seed },
        };

        log::debug!("POST {} ({} messages)", self.endpoint(), request.messages.len());
        let response = self
            .client
            .post(self.endpoint())
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

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        if let Some(error) = chat.error {
            return Err(BackendError::Provider {
                status: status.as_u16(),
                message: error,
            });
        }
        chat.message
            .map(|m| m.content)
            .ok_or_else(|| BackendError::MalformedResponse("response had no message".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
