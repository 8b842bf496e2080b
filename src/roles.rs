use async_trait::async_trait;
use std::sync::Arc;

use crate::conversation::ConversationalContext;
use crate::engine::{GameConfig, GamePhase};
use crate::error::{GameError, Participant, TemplateError, TurnError};
use crate::llm::LlmClient;
use crate::prompts::PromptBuilder;
use crate::traits::{DecisionMaker, Narrator};
use crate::types::PayoffMagnitudes;

/// Narrator driven by a language model, holding its own conversation
pub struct LlmNarrator {
    context: ConversationalContext,
    prompts: PromptBuilder,
    payoffs: PayoffMagnitudes,
}

impl LlmNarrator {
    /// Opens the narrator's conversation with the hidden odds of `config`.
    ///
    /// Fails if the weights are invalid or the system prompt cannot be rendered.
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompts: PromptBuilder,
        config: &GameConfig,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let system = prompts
            .narrator_system(&config.weights)
            .map_err(|source| GameError::Turn {
                phase: GamePhase::NotStarted,
                participant: Participant::Narrator,
                source: source.into(),
            })?;
        Ok(Self {
            context: ConversationalContext::new(client, "narrator", system),
            prompts,
            payoffs: config.weights.payoffs,
        })
    }

    pub fn context(&self) -> &ConversationalContext {
        &self.context
    }
}

#[async_trait]
impl Narrator for LlmNarrator {
    async fn opening(&mut self, num_rounds: u32, seed: u64) -> Result<String, TurnError> {
        let prompt = self.prompts.narrator_opening(num_rounds, &self.payoffs)?;
        Ok(self.context.send(prompt, seed).await?)
    }

    async fn intermediate(
        &mut self,
        previous_action: &str,
        rounds_left: u32,
        seed: u64,
    ) -> Result<String, TurnError> {
        let prompt = self.prompts.narrator_intermediate(previous_action, rounds_left)?;
        Ok(self.context.send(prompt, seed).await?)
    }

    async fn closing(&mut self, final_action: &str, seed: u64) -> Result<String, TurnError> {
        let prompt = self.prompts.narrator_closing(final_action)?;
        Ok(self.context.send(prompt, seed).await?)
    }
}

/// Decision-maker driven by a language model. It only ever sees narrator text.
pub struct LlmDecisionMaker {
    context: ConversationalContext,
    prompts: PromptBuilder,
}

impl LlmDecisionMaker {
    /// Opens the player's conversation; nothing about the odds goes into it
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptBuilder) -> Result<Self, TemplateError> {
        let system = prompts.decision_maker_system()?;
        Ok(Self {
            context: ConversationalContext::new(client, "player", system),
            prompts,
        })
    }

    pub fn context(&self) -> &ConversationalContext {
        &self.context
    }
}

#[async_trait]
impl DecisionMaker for LlmDecisionMaker {
    async fn choose(&mut self, scenario: &str, seed: u64) -> Result<String, TurnError> {
        let prompt = self.prompts.decision_maker_action(scenario)?;
        Ok(self.context.send(prompt, seed).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, WeightsError};
    use crate::types::{ChanceTriple, OutcomeWeights, Turn};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<Turn>>>,
    }

    #[async_trait]
    impl LlmClient for Recorder {
        async fn query(&self, turns: &[Turn], seed: u64) -> Result<String, BackendError> {
            self.calls.lock().unwrap().push(turns.to_vec());
            Ok(format!("reply with seed {}", seed))
        }
    }

    fn config() -> GameConfig {
        let weights = OutcomeWeights::new(ChanceTriple::new(0.2, 0.3, 0.5), PayoffMagnitudes::default());
        GameConfig::new(2, weights)
    }

    #[tokio::test]
    async fn narrator_and_player_keep_separate_histories() {
        let backend = Arc::new(Recorder::default());
        let mut narrator =
            LlmNarrator::new(backend.clone(), PromptBuilder::builtin(), &config()).unwrap();
        let mut player = LlmDecisionMaker::new(backend.clone(), PromptBuilder::builtin()).unwrap();

        let scenario = narrator.opening(2, 4).await.unwrap();
        assert_eq!(scenario, "reply with seed 4");
        player.choose(&scenario, 4).await.unwrap();

        assert_eq!(narrator.context().conversation().len(), 3);
        assert_eq!(player.context().conversation().len(), 3);

        let calls = backend.calls.lock().unwrap();
        let player_call = &calls[1];
        assert!(player_call
            .iter()
            .all(|turn| !turn.text.contains("chance of payoff")));
        assert!(calls[0][0].text.contains("0.50 chance of payoff 10"));
    }

    #[test]
    fn narrator_rejects_invalid_weights() {
        let bad = OutcomeWeights::new(ChanceTriple::new(0.5, 0.5, 0.5), PayoffMagnitudes::default());
        let result = LlmNarrator::new(
            Arc::new(Recorder::default()),
            PromptBuilder::builtin(),
            &GameConfig::new(2, bad),
        );
        assert!(matches!(
            result,
            Err(GameError::Weights(WeightsError::ChancesDoNotSumToOne(_)))
        ));
    }
}
