use std::sync::Arc;

use crate::conversation::ConversationalContext;
use crate::error::{BackendError, TemplateError};
use crate::llm::LlmClient;
use crate::prompts::PromptBuilder;
use crate::types::{ContrastPair, OutcomeWeights, TopicExample};

/// Categories the stochastic-game descriptions are generated for
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "natural disaster",
    "war",
    "political crisis",
    "cybersecurity",
    "rescue mission",
];

/// Topics the contrast pairs are generated for
pub const DEFAULT_TOPICS: [&str; 6] = [
    "honesty",
    "trust",
    "respect",
    "compassion",
    "justice",
    "freedom",
];

/// Marker that introduces the second continuation of a contrast pair
const SECOND_CONTINUATION: &str = "(2)";

/// Single-prompt generators. Each example gets a fresh conversation and is
/// seeded with its index; failed examples are logged and skipped.
pub struct DatasetGenerator {
    client: Arc<dyn LlmClient>,
    prompts: PromptBuilder,
}

impl DatasetGenerator {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptBuilder) -> Self {
        Self { client, prompts }
    }

    /// Descriptions of a stochastic game about `category`
    pub async fn stochastic_games(
        &self,
        category: &str,
        count: u64,
        num_rounds: u32,
        weights: &OutcomeWeights,
    ) -> Result<Vec<TopicExample>, TemplateError> {
        let system = self.prompts.stochastic_game_system()?;
        let prompt = self.prompts.stochastic_game(category, num_rounds, weights)?;
        log::info!("Generating examples for topic: {}", category);

        let mut examples = Vec::new();
        for example_num in 0..count {
            let mut context = ConversationalContext::new(Arc::clone(&self.client), category, system.clone());
            match context.send(prompt.clone(), example_num).await {
                Ok(example) => examples.push(TopicExample {
                    topic: category.to_string(),
                    example,
                }),
                Err(e) => log::error!("Skipping example {} for {}: {}", example_num, category, e),
            }
        }

        log::info!("Generated {} examples for category: {}", examples.len(), category);
        Ok(examples)
    }

    /// Branching prompts about `topic`, split into their two continuations
    pub async fn contrast_pairs(&self, topic: &str, count: u64) -> Result<Vec<ContrastPair>, TemplateError> {
        let system = self.prompts.contrast_pair_system()?;
        let prompt = self.prompts.contrast_pair(topic)?;
        log::info!("Generating examples for topic: {}", topic);

        let mut pairs = Vec::new();
        for example_num in 0..count {
            let mut context = ConversationalContext::new(Arc::clone(&self.client), topic, system.clone());
            let result = context
                .send(prompt.clone(), example_num)
                .await
                .and_then(|reply| split_contrast_pair(topic, &reply));
            match result {
                Ok(pair) => pairs.push(pair),
                Err(e) => log::error!("Skipping example {} for {}: {}", example_num, topic, e),
            }
        }

        log::info!("Generated {} examples for topic: {}", pairs.len(), topic);
        Ok(pairs)
    }
}

/// Flattens the reply onto one line and splits it at the second continuation
pub fn split_contrast_pair(topic: &str, reply: &str) -> Result<ContrastPair, BackendError> {
    let flat = reply.replace(['\r', '\n'], "");
    let parts: Vec<&str> = flat.split(SECOND_CONTINUATION).collect();
    match parts.as_slice() {
        [first, contrasting] => Ok(ContrastPair {
            topic: topic.to_string(),
            first: first.to_string(),
            contrasting: contrasting.to_string(),
        }),
        _ => Err(BackendError::MalformedResponse(format!(
            "expected exactly one '{}' marker, found {}",
            SECOND_CONTINUATION,
            parts.len() - 1
        ))),
    }
}
