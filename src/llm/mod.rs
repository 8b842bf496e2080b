pub mod ollama;
pub mod openai;
pub mod retry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::BackendError;
use crate::types::Turn;

/// A language-model backend: takes the whole conversation and a seed, returns generated text
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn query(&self, turns: &[Turn], seed: u64) -> Result<String, BackendError>;

    /// Short name used in log lines
    fn name(&self) -> &str {
        "llm"
    }
}

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use retry::{ResilientClient, RetryPolicy};

/// Role-tagged message in the chat format shared by both backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: String,
    pub content: String,
}

pub(crate) fn wire_messages(turns: &[Turn]) -> Vec<WireMessage> {
    turns
        .iter()
        .map(|turn| WireMessage {
            role: turn.role.as_str().to_string(),
            content: turn.text.clone(),
        })
        .collect()
}

/// Maps a failed reqwest call onto the backend error taxonomy.
///
/// `timeout` is the limit the HTTP client was built with, reported back on a timeout.
pub(crate) fn request_error(err: reqwest::Error, timeout: Option<Duration>) -> BackendError {
    if err.is_timeout() {
        if let Some(limit) = timeout {
            return BackendError::Timeout(limit);
        }
    }
    if err.is_decode() {
        BackendError::MalformedResponse(err.to_string())
    } else {
        BackendError::Transport(err.to_string())
    }
}

/// Reads `Retry-After` in either delta-seconds or HTTP-date form.
/// A date in the past means retry now.
fn parse_retry_after(value: &HeaderValue) -> Option<Duration> {
    let text = value.to_str().ok()?.trim();
    if let Ok(secs) = text.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(text).ok()?.with_timezone(&Utc);
    Some((at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}

/// Maps a non-success HTTP status and its body onto the backend error taxonomy
pub(crate) fn classify_status(status: StatusCode, headers: &HeaderMap, body: String) -> BackendError {
    let code = status.as_u16();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers.get(RETRY_AFTER).and_then(parse_retry_after);
        return BackendError::RateLimited { retry_after };
    }
    if status.is_server_error()
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
    {
        return BackendError::Provider {
            status: code,
            message: body,
        };
    }
    BackendError::MalformedRequest {
        status: code,
        message: body,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_reads_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, String::new());
        assert_eq!(
            err,
            BackendError::RateLimited {
                retry_after: Some(Duration::from_secs(7))
            }
        );
    }

    #[test]
    fn retry_after_accepts_http_dates() {
        let later = (Utc::now() + chrono::Duration::seconds(90)).to_rfc2822();
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(&later).unwrap());
        match classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, String::new()) {
            BackendError::RateLimited {
                retry_after: Some(wait),
            } => assert!(wait > Duration::from_secs(80) && wait <= Duration::from_secs(90)),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, String::new()),
            BackendError::RateLimited {
                retry_after: Some(Duration::ZERO)
            }
        );
    }

    #[test]
    fn unparseable_retry_after_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, String::new()),
            BackendError::RateLimited { retry_after: None }
        );
    }

    #[test]
    fn client_and_server_errors_split() {
        let headers = HeaderMap::new();
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, &headers, "bad".into()),
            BackendError::MalformedRequest { status: 400, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, &headers, "down".into()),
            BackendError::Provider { status: 502, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, &headers, "key".into()),
            BackendError::Provider { status: 401, .. }
        ));
    }

    #[test]
    fn wire_messages_keep_order_and_roles() {
        let turns = vec![Turn::system("sys"), Turn::user("hi"), Turn::assistant("yo")];
        let wire = wire_messages(&turns);
        let roles: Vec<_> = wire.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant"]);
        assert_eq!(wire[2].content, "yo");
    }
}
