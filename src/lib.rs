//! # Game Scenarios
//!
//! Drives language-model backends to produce datasets of game-theoretic
//! narrative scenarios and the decisions a player makes in them.
//!
//! ## Features
//!
//! - **Conversational Context**: per-participant transcript replayed in full on every call
//! - **Game Loop**: narrator/decision-maker rounds ending in a closing narrative
//! - **Outcome Scoring**: expected payoff of cooperative, deceptive and aggressive moves
//! - **Dataset Generators**: one-shot stochastic-game descriptions and contrast pairs
//! - **Backends**: hosted OpenAI-compatible API or a local Ollama model, behind one trait
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use game_scenarios::{
//!     llm::{OllamaClient, ResilientClient, RetryPolicy, LlmClient},
//!     ChanceTriple, GameConfig, GameLoop, LlmDecisionMaker, LlmNarrator, OutcomeWeights,
//!     PayoffMagnitudes, PromptBuilder,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let llm: Arc<dyn LlmClient> = Arc::new(ResilientClient::new(
//!     OllamaClient::new("llama3.2:latest"),
//!     RetryPolicy::default(),
//! ));
//! let weights = OutcomeWeights::new(ChanceTriple::new(0.2, 0.3, 0.5), PayoffMagnitudes::default());
//! let config = GameConfig::new(3, weights).with_seed(42);
//!
//! let narrator = LlmNarrator::new(llm.clone(), PromptBuilder::builtin(), &config)?;
//! let player = LlmDecisionMaker::new(llm, PromptBuilder::builtin())?;
//! let transcript = GameLoop::new(narrator, player, config)?.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod conversation;
pub mod datasets;
pub mod engine;
pub mod error;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod roles;
pub mod scoring;
pub mod traits;
pub mod types;

// Re-export main types for convenience
pub use conversation::{Conversation, ConversationalContext};
pub use datasets::DatasetGenerator;
pub use engine::{GameConfig, GameLoop, GamePhase};
pub use error::{BackendError, GameError, Participant, TemplateError, TurnError, WeightsError};
pub use prompts::{PromptBuilder, PromptLoader, TemplateId};
pub use roles::{LlmDecisionMaker, LlmNarrator};
pub use scoring::{best_archetype, expected_payoff, score_all, Scored};
pub use traits::{DecisionMaker, Narrator};
pub use types::{
    Archetype, ChanceTriple, ContrastPair, GameTranscript, OutcomeWeights, PayoffMagnitudes, Role,
    RoundRecord, TopicExample, Turn,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
