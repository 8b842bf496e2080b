use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeightsError;

/// Tolerance used when checking that a chance triple sums to one
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// Who authored a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Role name in the chat wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single entry in a conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    /// Turn stamped with the current time
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// Instruction that opens every conversation
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Prompt sent to the backend
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Reply received from the backend
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// One narrator output and the decision-maker's answer to it.
///
/// The closing record of a game carries no decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub narrator_output: String,
    pub decision_maker_output: Option<String>,
}

impl RoundRecord {
    /// A round the decision-maker answered
    pub fn decision(narrator_output: impl Into<String>, decision: impl Into<String>) -> Self {
        Self {
            narrator_output: narrator_output.into(),
            decision_maker_output: Some(decision.into()),
        }
    }

    /// The narrator's final output, which nobody answers
    pub fn closing(narrator_output: impl Into<String>) -> Self {
        Self {
            narrator_output: narrator_output.into(),
            decision_maker_output: None,
        }
    }

    /// True for the record without a decision
    pub fn is_closing(&self) -> bool {
        self.decision_maker_output.is_none()
    }
}

/// Payoff values a stage can result in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffMagnitudes {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl PayoffMagnitudes {
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }
}

impl Default for PayoffMagnitudes {
    fn default() -> Self {
        Self::new(1.0, 5.0, 10.0)
    }
}

/// Probabilities attached to the low/mid/high outcome of a move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanceTriple {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl ChanceTriple {
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    /// Draws a triple the way the dataset runs have always done it:
    /// `high` in [0.40, 0.59], `mid` in [0.20, high/3*2), `low` takes the rest.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let high_pct: u32 = rng.gen_range(40..60);
        let high = f64::from(high_pct) / 100.0;
        let mid_upper = (high / 3.0 * 200.0) as u32;
        let mid_pct: u32 = rng.gen_range(20..mid_upper.max(21));
        let mid = f64::from(mid_pct) / 100.0;
        Self {
            low: 1.0 - high - mid,
            mid,
            high,
        }
    }

    /// Total probability mass; 1 for a valid triple
    pub fn sum(&self) -> f64 {
        self.low + self.mid + self.high
    }
}

/// Chances and payoffs that define the stochastic game behind a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeWeights {
    pub chances: ChanceTriple,
    pub payoffs: PayoffMagnitudes,
}

impl OutcomeWeights {
    pub fn new(chances: ChanceTriple, payoffs: PayoffMagnitudes) -> Self {
        Self { chances, payoffs }
    }

    /// Checks every chance lies in [0, 1], the chances sum to one and payoffs are finite
    pub fn validate(&self) -> Result<(), WeightsError> {
        let c = &self.chances;
        for (name, value) in [("low", c.low), ("mid", c.mid), ("high", c.high)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(WeightsError::ChanceOutOfRange { name, value });
            }
        }
        let sum = c.sum();
        if (sum - 1.0).abs() > PROBABILITY_EPSILON {
            return Err(WeightsError::ChancesDoNotSumToOne(sum));
        }
        let p = &self.payoffs;
        for (name, value) in [("low", p.low), ("mid", p.mid), ("high", p.high)] {
            if !value.is_finite() {
                return Err(WeightsError::NonFinitePayoff { name, value });
            }
        }
        Ok(())
    }
}

/// Move categories offered to the decision-maker each round, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Cooperative,
    Deceptive,
    Aggressive,
}

impl Archetype {
    pub const ALL: [Archetype; 3] = [
        Archetype::Cooperative,
        Archetype::Deceptive,
        Archetype::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Cooperative => "Cooperative",
            Archetype::Deceptive => "Deceptive",
            Archetype::Aggressive => "Aggressive",
        }
    }

    /// Chance attached to each payoff magnitude for this archetype,
    /// returned as (low payoff, mid payoff, high payoff)
    pub fn distribution(&self, chances: &ChanceTriple) -> (f64, f64, f64) {
        match self {
            Archetype::Cooperative => (chances.low, chances.mid, chances.high),
            Archetype::Deceptive => (chances.mid, chances.high, chances.low),
            Archetype::Aggressive => (chances.high, chances.mid, chances.low),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every round of a finished game together with the weights it was played under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTranscript {
    pub weights: OutcomeWeights,
    pub rounds: Vec<RoundRecord>,
}

impl GameTranscript {
    /// Decision-maker outputs in round order
    pub fn decisions(&self) -> impl Iterator<Item = &str> {
        self.rounds
            .iter()
            .filter_map(|r| r.decision_maker_output.as_deref())
    }
}

/// A generated example tagged with the topic it was generated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicExample {
    pub topic: String,
    pub example: String,
}

/// Two continuations of the same branching prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastPair {
    pub topic: String,
    pub first: String,
    pub contrasting: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampled_chances_are_valid_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let chances = ChanceTriple::sample(&mut rng);
            assert!((0.40..0.60).contains(&chances.high));
            assert!(chances.mid >= 0.20 && chances.mid < chances.high);
            let weights = OutcomeWeights::new(chances, PayoffMagnitudes::default());
            assert!(weights.validate().is_ok(), "{:?}", chances);
        }
    }

    #[test]
    fn validate_rejects_bad_chances() {
        let weights = OutcomeWeights::new(
            ChanceTriple::new(0.5, 0.5, 0.5),
            PayoffMagnitudes::default(),
        );
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::ChancesDoNotSumToOne(_))
        ));

        let weights = OutcomeWeights::new(
            ChanceTriple::new(-0.1, 0.6, 0.5),
            PayoffMagnitudes::default(),
        );
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::ChanceOutOfRange { name: "low", .. })
        ));
    }

    #[test]
    fn validate_rejects_non_finite_payoff() {
        let weights = OutcomeWeights::new(
            ChanceTriple::new(0.2, 0.3, 0.5),
            PayoffMagnitudes::new(1.0, f64::NAN, 10.0),
        );
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::NonFinitePayoff { name: "mid", .. })
        ));
    }

    #[test]
    fn role_serializes_to_wire_names() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
