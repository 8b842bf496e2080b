use async_trait::async_trait;

use crate::error::TurnError;

/// The role that tells the story: scenarios, candidate moves and the ending.
///
/// `seed` is the game's seed, forwarded unchanged to every backend call.
#[async_trait]
pub trait Narrator: Send {
    /// Opening scenario plus three candidate moves
    async fn opening(&mut self, num_rounds: u32, seed: u64) -> Result<String, TurnError>;

    /// Resolves the previous move and presents the next scenario
    async fn intermediate(
        &mut self,
        previous_action: &str,
        rounds_left: u32,
        seed: u64,
    ) -> Result<String, TurnError>;

    /// Resolves the final move and ends the story
    async fn closing(&mut self, final_action: &str, seed: u64) -> Result<String, TurnError>;
}

/// The role that picks one of the narrator's candidate moves
#[async_trait]
pub trait DecisionMaker: Send {
    /// Answers a scenario with the chosen move and a short justification
    async fn choose(&mut self, scenario: &str, seed: u64) -> Result<String, TurnError>;
}
