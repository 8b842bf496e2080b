use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

use game_scenarios::config::{BackendConfig, BackendKind};
use game_scenarios::datasets::{DatasetGenerator, DEFAULT_CATEGORIES, DEFAULT_TOPICS};
use game_scenarios::llm::RetryPolicy;
use game_scenarios::{
    best_archetype, output, score_all, ChanceTriple, GameConfig, GameLoop, LlmDecisionMaker,
    LlmNarrator, OutcomeWeights, PayoffMagnitudes, PromptBuilder,
};

#[derive(Debug, Parser)]
#[command(
    name = "game-scenarios",
    version,
    about = "Generate CSV datasets of game-theoretic scenarios with language models"
)]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// Directory holding prompt template overrides
    #[arg(long, env = "PROMPTS_DIR", default_value = "prompts", global = true)]
    prompts_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct BackendArgs {
    /// openai (hosted) or ollama (local)
    #[arg(long, env = "LLM_BACKEND", default_value = "openai", global = true)]
    backend: BackendKind,

    /// Model name; defaults to OPENAI_MODEL or OLLAMA_MODEL for the chosen backend
    #[arg(long, global = true)]
    model: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Override the backend URL (OPENAI_BASE_URL / OLLAMA_HOST)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seconds before a single backend call is abandoned
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 120, global = true)]
    timeout_secs: u64,

    /// Attempts per call, including the first
    #[arg(long, env = "LLM_MAX_ATTEMPTS", default_value_t = 3, global = true)]
    max_attempts: u32,
}

#[derive(Debug, Args)]
struct PayoffArgs {
    #[arg(long, env = "LOW_PAYOFF", default_value_t = 1.0)]
    low_payoff: f64,

    #[arg(long, env = "MID_PAYOFF", default_value_t = 5.0)]
    mid_payoff: f64,

    #[arg(long, env = "HIGH_PAYOFF", default_value_t = 10.0)]
    high_payoff: f64,

    /// Seed for sampling the hidden chances; random when omitted
    #[arg(long, env = "CHANCE_SEED")]
    chance_seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play one narrator/player game and record every round
    Game {
        #[arg(long, env = "NUM_ROUNDS", default_value_t = 3)]
        rounds: u32,

        /// Seed passed to every backend call
        #[arg(long, env = "SEED", default_value_t = 0)]
        seed: u64,

        #[command(flatten)]
        payoffs: PayoffArgs,

        #[arg(long, env = "OUTPUT_FILE", default_value = "pairs.csv")]
        output: PathBuf,

        #[arg(long, env = "PROBABILITIES_OUTPUT_FILE", default_value = "probabilities.csv")]
        probabilities_output: PathBuf,
    },
    /// One-shot stochastic game descriptions for each category
    Stochastic {
        #[arg(long, env = "NUM_EXAMPLES", default_value_t = 1)]
        examples: u64,

        #[arg(long, env = "NUM_ROUNDS", default_value_t = 10)]
        rounds: u32,

        /// Categories to generate for; defaults to the built-in list
        #[arg(long = "category")]
        categories: Vec<String>,

        #[command(flatten)]
        payoffs: PayoffArgs,

        #[arg(long, env = "OUTPUT_FILE", default_value = "pairs.csv")]
        output: PathBuf,
    },
    /// Branching prompt pairs for each moral topic
    Contrast {
        #[arg(long, env = "NUM_EXAMPLES", default_value_t = 5)]
        examples: u64,

        /// Topics to generate for; defaults to the built-in list
        #[arg(long = "topic")]
        topics: Vec<String>,

        #[arg(long, env = "OUTPUT_FILE", default_value = "pairs.csv")]
        output: PathBuf,
    },
}

impl BackendArgs {
    fn to_config(&self) -> BackendConfig {
        let (model_var, url_var) = match self.backend {
            BackendKind::OpenAi => ("OPENAI_MODEL", "OPENAI_BASE_URL"),
            BackendKind::Ollama => ("OLLAMA_MODEL", "OLLAMA_HOST"),
        };
        let mut config = BackendConfig::new(self.backend);
        config.model = self.model.clone().or_else(|| env_non_empty(model_var));
        config.base_url = self.base_url.clone().or_else(|| env_non_empty(url_var));
        config.api_key = self.api_key.clone();
        config.retry = RetryPolicy::default()
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_attempts(self.max_attempts);
        config
    }
}

impl PayoffArgs {
    fn weights(&self) -> Result<OutcomeWeights> {
        let mut rng = match self.chance_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let weights = OutcomeWeights::new(
            ChanceTriple::sample(&mut rng),
            PayoffMagnitudes::new(self.low_payoff, self.mid_payoff, self.high_payoff),
        );
        weights.validate()?;
        Ok(weights)
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn or_defaults(given: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if given.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        given
    }
}

fn report_best_move(weights: &OutcomeWeights) {
    for scored in score_all(weights) {
        log::info!("  {}: expected payoff {:.3}", scored.archetype, scored.expected_payoff);
    }
    let best = best_archetype(weights);
    println!(
        "The best action is {} with an expected payoff of {:.3}",
        best.archetype, best.expected_payoff
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let llm = cli.backend.to_config().build_client()?;
    let prompts = PromptBuilder::new(&cli.prompts_dir);

    match cli.command {
        Command::Game {
            rounds,
            seed,
            payoffs,
            output,
            probabilities_output,
        } => {
            let weights = payoffs.weights()?;
            let config = GameConfig::new(rounds, weights).with_seed(seed);
            let narrator = LlmNarrator::new(llm.clone(), prompts.clone(), &config)?;
            let player = LlmDecisionMaker::new(llm, prompts)?;

            let transcript = GameLoop::new(narrator, player, config)?
                .run()
                .await
                .context("Game aborted")?;

            let written = output::write_transcript(&output, &transcript)?;
            log::info!("Generated {} examples. Output file: {}", written, output.display());
            output::write_probabilities(&probabilities_output, &transcript.weights)?;
            log::info!("Probabilities written to {}", probabilities_output.display());
            report_best_move(&transcript.weights);
        }
        Command::Stochastic {
            examples,
            rounds,
            categories,
            payoffs,
            output,
        } => {
            let weights = payoffs.weights()?;
            let generator = DatasetGenerator::new(llm, prompts);
            let mut all = Vec::new();
            for category in or_defaults(categories, &DEFAULT_CATEGORIES) {
                all.extend(generator.stochastic_games(&category, examples, rounds, &weights).await?);
            }
            let written = output::write_topic_examples(&output, &all)?;
            log::info!("Training data generated successfully ({} rows). Output file: {}", written, output.display());
            report_best_move(&weights);
        }
        Command::Contrast {
            examples,
            topics,
            output,
        } => {
            let generator = DatasetGenerator::new(llm, prompts);
            let mut all = Vec::new();
            for topic in or_defaults(topics, &DEFAULT_TOPICS) {
                all.extend(generator.contrast_pairs(&topic, examples).await?);
            }
            let written = output::write_contrast_pairs(&output, &all)?;
            log::info!("Training data generated successfully ({} rows). Output file: {}", written, output.display());
        }
    }

    Ok(())
}
