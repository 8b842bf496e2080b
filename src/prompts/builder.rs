use std::path::Path;

use super::loader::{PromptLoader, TemplateId};
use super::render::{render, TemplateParams};
use crate::error::TemplateError;
use crate::types::{ChanceTriple, OutcomeWeights, PayoffMagnitudes};

/// Builds prompts for the narrator, the decision-maker and the one-shot generators
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    loader: PromptLoader,
}

impl PromptBuilder {
    /// Builder reading overrides from `prompts_dir`, falling back to the defaults
    pub fn new(prompts_dir: impl AsRef<Path>) -> Self {
        Self {
            loader: PromptLoader::new(prompts_dir),
        }
    }

    /// Builder that only uses the built-in templates
    pub fn builtin() -> Self {
        Self {
            loader: PromptLoader::builtin(),
        }
    }

    pub fn from_loader(loader: PromptLoader) -> Self {
        Self { loader }
    }

    /// Renders any template with caller-supplied parameters
    pub fn render(&self, id: TemplateId, params: &TemplateParams) -> Result<String, TemplateError> {
        let source = self.loader.load(id)?;
        render(id.file_stem(), &source, params)
    }

    /// Narrator system prompt; the only place the hidden odds are spelled out
    pub fn narrator_system(&self, weights: &OutcomeWeights) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        insert_chances(&mut params, &weights.chances);
        insert_payoffs(&mut params, &weights.payoffs);
        self.render(TemplateId::NarratorSystem, &params)
    }

    /// First narrator prompt: round count and the payoff scale
    pub fn narrator_opening(
        &self,
        num_rounds: u32,
        payoffs: &PayoffMagnitudes,
    ) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        params.insert("num_rounds", num_rounds.to_string());
        insert_payoffs(&mut params, payoffs);
        self.render(TemplateId::NarratorOpening, &params)
    }

    /// Relays the player's previous move and the rounds left
    pub fn narrator_intermediate(
        &self,
        previous_action: &str,
        rounds_left: u32,
    ) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        params.insert("llm_action", previous_action.to_string());
        params.insert("num_rounds_left", rounds_left.to_string());
        self.render(TemplateId::NarratorIntermediate, &params)
    }

    /// Relays the final move and asks for the ending
    pub fn narrator_closing(&self, final_action: &str) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        params.insert("llm_action", final_action.to_string());
        self.render(TemplateId::NarratorClosing, &params)
    }

    /// Player system prompt. Takes no parameters, so it can never leak the odds.
    pub fn decision_maker_system(&self) -> Result<String, TemplateError> {
        self.render(TemplateId::DecisionMakerSystem, &TemplateParams::new())
    }

    /// Wraps the narrator's scenario for the player
    pub fn decision_maker_action(&self, scenario: &str) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        params.insert("current_scenario", scenario.to_string());
        self.render(TemplateId::DecisionMakerAction, &params)
    }

    /// System prompt for one-shot stochastic-game descriptions
    pub fn stochastic_game_system(&self) -> Result<String, TemplateError> {
        self.render(TemplateId::StochasticGameSystem, &TemplateParams::new())
    }

    /// One-shot description request for `category`, spelling out the odds
    pub fn stochastic_game(
        &self,
        category: &str,
        num_rounds: u32,
        weights: &OutcomeWeights,
    ) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        params.insert("category", category.to_string());
        params.insert("num_rounds", num_rounds.to_string());
        insert_chances(&mut params, &weights.chances);
        insert_payoffs(&mut params, &weights.payoffs);
        self.render(TemplateId::StochasticGame, &params)
    }

    /// System prompt for contrast-pair generation
    pub fn contrast_pair_system(&self) -> Result<String, TemplateError> {
        self.render(TemplateId::ContrastPairSystem, &TemplateParams::new())
    }

    /// Branching prompt request for `topic`
    pub fn contrast_pair(&self, topic: &str) -> Result<String, TemplateError> {
        let mut params = TemplateParams::new();
        params.insert("topic", topic.to_string());
        self.render(TemplateId::ContrastPair, &params)
    }
}

/// Chances are shown with two decimals so `1 - 0.45 - 0.25` reads as `0.30`
pub fn format_chance(value: f64) -> String {
    format!("{:.2}", value)
}

fn insert_chances(params: &mut TemplateParams, chances: &ChanceTriple) {
    params.insert("low_chance", format_chance(chances.low));
    params.insert("mid_chance", format_chance(chances.mid));
    params.insert("high_chance", format_chance(chances.high));
}

fn insert_payoffs(params: &mut TemplateParams, payoffs: &PayoffMagnitudes) {
    params.insert("low_payoff", payoffs.low.to_string());
    params.insert("mid_payoff", payoffs.mid.to_string());
    params.insert("high_payoff", payoffs.high.to_string());
}
