pub mod builder;
pub mod loader;
pub mod render;
pub mod templates;

pub use builder::PromptBuilder;
pub use loader::{PromptLoader, TemplateId};
pub use render::{render, TemplateParams};
