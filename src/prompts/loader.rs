use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use super::templates::*;
use crate::error::TemplateError;

/// Every prompt the crate knows how to compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    NarratorSystem,
    NarratorOpening,
    NarratorIntermediate,
    NarratorClosing,
    DecisionMakerSystem,
    DecisionMakerAction,
    StochasticGameSystem,
    StochasticGame,
    ContrastPairSystem,
    ContrastPair,
}

impl TemplateId {
    /// File name (without extension) looked up in the prompts directory
    pub fn file_stem(&self) -> &'static str {
        match self {
            TemplateId::NarratorSystem => "gm_system_message",
            TemplateId::NarratorOpening => "gm_initial_scenario",
            TemplateId::NarratorIntermediate => "gm_intermediate_scenario",
            TemplateId::NarratorClosing => "gm_final_scenario",
            TemplateId::DecisionMakerSystem => "player_system_message",
            TemplateId::DecisionMakerAction => "player_action",
            TemplateId::StochasticGameSystem => "stochastic_game_system_message",
            TemplateId::StochasticGame => "stochastic_game",
            TemplateId::ContrastPairSystem => "contrast_pair_system_message",
            TemplateId::ContrastPair => "contrast_pair",
        }
    }

    pub fn default_text(&self) -> &'static str {
        match self {
            TemplateId::NarratorSystem => NARRATOR_SYSTEM_DEFAULT,
            TemplateId::NarratorOpening => NARRATOR_OPENING_DEFAULT,
            TemplateId::NarratorIntermediate => NARRATOR_INTERMEDIATE_DEFAULT,
            TemplateId::NarratorClosing => NARRATOR_CLOSING_DEFAULT,
            TemplateId::DecisionMakerSystem => DECISION_MAKER_SYSTEM_DEFAULT,
            TemplateId::DecisionMakerAction => DECISION_MAKER_ACTION_DEFAULT,
            TemplateId::StochasticGameSystem => STOCHASTIC_GAME_SYSTEM_DEFAULT,
            TemplateId::StochasticGame => STOCHASTIC_GAME_DEFAULT,
            TemplateId::ContrastPairSystem => CONTRAST_PAIR_SYSTEM_DEFAULT,
            TemplateId::ContrastPair => CONTRAST_PAIR_DEFAULT,
        }
    }
}

/// Loads prompt templates from the filesystem with fallback to defaults
#[derive(Debug, Clone)]
pub struct PromptLoader {
    prompts_dir: Option<PathBuf>,
}

impl PromptLoader {
    pub fn new(prompts_dir: impl AsRef<Path>) -> Self {
        Self {
            prompts_dir: Some(prompts_dir.as_ref().to_path_buf()),
        }
    }

    /// A loader that only ever returns the built-in templates
    pub fn builtin() -> Self {
        Self { prompts_dir: None }
    }

    pub fn load(&self, id: TemplateId) -> Result<Cow<'static, str>, TemplateError> {
        if let Some(dir) = &self.prompts_dir {
            for ext in ["md", "txt", "j2"] {
                let path = dir.join(format!("{}.{}", id.file_stem(), ext));
                if path.exists() {
                    log::debug!("Loading {} prompt from: {:?}", id.file_stem(), path);
                    return fs::read_to_string(&path).map(Cow::Owned).map_err(|e| {
                        TemplateError::Unreadable {
                            template: id.file_stem().to_string(),
                            message: e.to_string(),
                        }
                    });
                }
            }
        }

        log::debug!("Using default {} prompt", id.file_stem());
        Ok(Cow::Borrowed(id.default_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let loader = PromptLoader::new(dir.path());
        let text = loader.load(TemplateId::DecisionMakerAction).unwrap();
        assert_eq!(text, DECISION_MAKER_ACTION_DEFAULT);
    }

    #[test]
    fn file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("player_action.md"), "Pick: {{ current_scenario }}").unwrap();
        let loader = PromptLoader::new(dir.path());
        let text = loader.load(TemplateId::DecisionMakerAction).unwrap();
        assert_eq!(text, "Pick: {{ current_scenario }}");
        // other templates still use their defaults
        let other = loader.load(TemplateId::NarratorClosing).unwrap();
        assert_eq!(other, NARRATOR_CLOSING_DEFAULT);
    }

    #[test]
    fn builtin_loader_never_touches_disk() {
        let text = PromptLoader::builtin().load(TemplateId::ContrastPairSystem).unwrap();
        assert_eq!(text, "You are a helpful assistant.");
    }
}
