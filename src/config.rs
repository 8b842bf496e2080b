//! Backend selection and construction of the shared client handle.

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::llm::{ollama, openai, LlmClient, OllamaClient, OpenAiClient, ResilientClient, RetryPolicy};

/// Which family of backend answers the prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted OpenAI-compatible chat completions
    OpenAi,
    /// Local model served by Ollama
    Ollama,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "hosted" => Ok(BackendKind::OpenAi),
            "ollama" | "local" => Ok(BackendKind::Ollama),
            other => Err(format!("unknown backend '{}', expected openai or ollama", other)),
        }
    }
}

/// Everything needed to build the one backend handle a process uses
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub retry: RetryPolicy,
}

impl BackendConfig {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            model: None,
            base_url: None,
            api_key: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn model_name(&self) -> &str {
        match (&self.model, self.kind) {
            (Some(model), _) => model,
            (None, BackendKind::OpenAi) => openai::DEFAULT_MODEL,
            (None, BackendKind::Ollama) => ollama::DEFAULT_MODEL,
        }
    }

    /// Builds the backend wrapped in the retry policy
    pub fn build_client(&self) -> Result<Arc<dyn LlmClient>> {
        // the HTTP client gets a little slack so the policy's own timeout fires first
        let http_timeout = self.retry.request_timeout + Duration::from_secs(5);
        let client: Arc<dyn LlmClient> = match self.kind {
            BackendKind::OpenAi => {
                let Some(api_key) = self.api_key.clone().filter(|k| !k.trim().is_empty()) else {
                    bail!("OPENAI_API_KEY must be set to use the openai backend");
                };
                let mut client = OpenAiClient::new(api_key, self.model_name()).with_timeout(http_timeout)?;
                if let Some(url) = &self.base_url {
                    client = client.with_base_url(url);
                }
                Arc::new(ResilientClient::new(client, self.retry))
            }
            BackendKind::Ollama => {
                let mut client = OllamaClient::new(self.model_name()).with_timeout(http_timeout)?;
                if let Some(url) = &self.base_url {
                    client = client.with_host(url);
                }
                Arc::new(ResilientClient::new(client, self.retry))
            }
        };
        log::info!("Using {:?} backend with model {}", self.kind, self.model_name());
        Ok(client)
    }
}
