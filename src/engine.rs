use serde::Serialize;
use std::fmt;

use crate::error::{GameError, Participant, TurnError};
use crate::traits::{DecisionMaker, Narrator};
use crate::types::{GameTranscript, OutcomeWeights, RoundRecord};

/// Where a game currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    NotStarted,
    Opening,
    Intermediate { rounds_left: u32 },
    Closing,
    Done,
}

impl GamePhase {
    /// Next phase of a game lasting `num_rounds` decision-maker turns
    pub fn advance(self, num_rounds: u32) -> GamePhase {
        match self {
            GamePhase::NotStarted => GamePhase::Opening,
            GamePhase::Opening if num_rounds > 1 => GamePhase::Intermediate {
                rounds_left: num_rounds - 1,
            },
            GamePhase::Opening => GamePhase::Closing,
            GamePhase::Intermediate { rounds_left } if rounds_left > 1 => GamePhase::Intermediate {
                rounds_left: rounds_left - 1,
            },
            GamePhase::Intermediate { .. } => GamePhase::Closing,
            GamePhase::Closing | GamePhase::Done => GamePhase::Done,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::NotStarted => f.write_str("not started"),
            GamePhase::Opening => f.write_str("opening"),
            GamePhase::Intermediate { rounds_left } => {
                write!(f, "intermediate round ({} left)", rounds_left)
            }
            GamePhase::Closing => f.write_str("closing"),
            GamePhase::Done => f.write_str("done"),
        }
    }
}

/// Parameters of a single game run. The only source of the odds and the seed a game uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameConfig {
    pub num_rounds: u32,
    pub weights: OutcomeWeights,
    pub seed: u64,
}

impl GameConfig {
    /// A game with seed 0
    pub fn new(num_rounds: u32, weights: OutcomeWeights) -> Self {
        Self {
            num_rounds,
            weights,
            seed: 0,
        }
    }

    /// Seed passed to every backend call of the game
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the round count and the weights
    pub fn validate(&self) -> Result<(), GameError> {
        if self.num_rounds == 0 {
            return Err(GameError::InvalidConfig(
                "a game needs at least one round".to_string(),
            ));
        }
        self.weights.validate()?;
        Ok(())
    }
}

/// Drives a narrator and a decision-maker through a fixed number of rounds.
///
/// The two participants never share a conversation; the decision-maker only
/// receives the scenario text the narrator produced.
pub struct GameLoop<N, D> {
    narrator: N,
    decision_maker: D,
    config: GameConfig,
}

impl<N: Narrator, D: DecisionMaker> GameLoop<N, D> {
    /// Validates `config` and wires the two participants together
    pub fn new(narrator: N, decision_maker: D, config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            narrator,
            decision_maker,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Plays the game to completion. Any failed turn aborts the run.
    pub async fn run(mut self) -> Result<GameTranscript, GameError> {
        let num_rounds = self.config.num_rounds;
        let seed = self.config.seed;
        let mut rounds = Vec::with_capacity(num_rounds as usize + 1);
        let mut last_action = String::new();
        let mut phase = GamePhase::NotStarted.advance(num_rounds);

        log::info!("🎲 Starting a {}-round game", num_rounds);

        while phase != GamePhase::Done {
            let scenario = match phase {
                GamePhase::Opening => self.narrator.opening(num_rounds, seed).await,
                GamePhase::Intermediate { rounds_left } => {
                    self.narrator.intermediate(&last_action, rounds_left, seed).await
                }
                GamePhase::Closing => self.narrator.closing(&last_action, seed).await,
                GamePhase::NotStarted | GamePhase::Done => break,
            }
            .map_err(|source| turn_failed(phase, Participant::Narrator, source))?;

            if phase == GamePhase::Closing {
                log::info!("📜 Closing narrative received");
                rounds.push(RoundRecord::closing(scenario));
            } else {
                last_action = self
                    .decision_maker
                    .choose(&scenario, seed)
                    .await
                    .map_err(|source| turn_failed(phase, Participant::DecisionMaker, source))?;
                log::info!("🎭 Decision recorded for {}", phase);
                rounds.push(RoundRecord::decision(scenario, last_action.clone()));
            }

            phase = phase.advance(num_rounds);
        }

        log::info!("Game finished with {} records", rounds.len());
        Ok(GameTranscript {
            weights: self.config.weights,
            rounds,
        })
    }
}

fn turn_failed(phase: GamePhase, participant: Participant, source: TurnError) -> GameError {
    log::error!("{} failed during {}: {}", participant, phase, source);
    GameError::Turn {
        phase,
        participant,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_for_three_rounds() {
        let mut phase = GamePhase::NotStarted;
        let mut seen = Vec::new();
        while phase != GamePhase::Done {
            phase = phase.advance(3);
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                GamePhase::Opening,
                GamePhase::Intermediate { rounds_left: 2 },
                GamePhase::Intermediate { rounds_left: 1 },
                GamePhase::Closing,
                GamePhase::Done,
            ]
        );
    }

    #[test]
    fn single_round_goes_straight_to_closing() {
        assert_eq!(GamePhase::Opening.advance(1), GamePhase::Closing);
        assert_eq!(GamePhase::Done.advance(1), GamePhase::Done);
    }

    #[test]
    fn zero_rounds_is_rejected() {
        let config = GameConfig::new(0, OutcomeWeights::new(
            crate::types::ChanceTriple::new(0.2, 0.3, 0.5),
            crate::types::PayoffMagnitudes::default(),
        ));
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn phase_display() {
        assert_eq!(
            GamePhase::Intermediate { rounds_left: 2 }.to_string(),
            "intermediate round (2 left)"
        );
    }
}
