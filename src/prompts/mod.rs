//! Prompt registry and literal-substitution templating (§4.2, §4.4, §4.6, §9).

mod defaults;
mod registry;
mod template;

pub use registry::{PromptName, PromptRegistry};
pub use template::render;
