use std::time::Duration;
use thiserror::Error;

use crate::engine::GamePhase;

/// Failures reported by a language-model backend, whichever backend produced them
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    #[error("request rejected ({status}): {message}")]
    MalformedRequest { status: u16, message: String },

    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Whether a retry has a chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Transport(_)
            | BackendError::Timeout(_)
            | BackendError::RateLimited { .. } => true,
            BackendError::Provider { status, .. } => *status >= 500,
            BackendError::MalformedRequest { .. } | BackendError::MalformedResponse(_) => false,
        }
    }
}

/// Prompt composition failures. These point at a caller bug and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template '{template}' references missing parameter '{name}'")]
    MissingParameter { template: String, name: String },

    #[error("template '{template}' has an unterminated placeholder at byte {offset}")]
    Unterminated { template: String, offset: usize },

    #[error("failed to read template '{template}': {message}")]
    Unreadable { template: String, message: String },
}

/// Why a single narrator or decision-maker turn failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl TurnError {
    pub fn is_template(&self) -> bool {
        matches!(self, TurnError::Template(_))
    }
}

/// Which participant of the game a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Narrator,
    DecisionMaker,
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Participant::Narrator => f.write_str("narrator"),
            Participant::DecisionMaker => f.write_str("decision-maker"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("{participant} turn failed during {phase}: {source}")]
    Turn {
        phase: GamePhase,
        participant: Participant,
        #[source]
        source: TurnError,
    },

    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Weights(#[from] WeightsError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("{name} chance {value} is outside [0, 1]")]
    ChanceOutOfRange { name: &'static str, value: f64 },

    #[error("chances sum to {0}, expected 1")]
    ChancesDoNotSumToOne(f64),

    #[error("{name} payoff {value} is not finite")]
    NonFinitePayoff { name: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(BackendError::Transport("reset".into()).is_transient());
        assert!(BackendError::RateLimited { retry_after: None }.is_transient());
        assert!(BackendError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(BackendError::Provider {
            status: 503,
            message: "overloaded".into()
        }
        .is_transient());
        assert!(!BackendError::Provider {
            status: 401,
            message: "bad key".into()
        }
        .is_transient());
        assert!(!BackendError::MalformedResponse("empty".into()).is_transient());
    }
}
