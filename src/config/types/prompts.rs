//! Prompt-registry configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsConfig {
    /// API key for the prompt registry (LangSmith-style `pull(name)` service).
    #[serde(default = "default_secret")]
    pub api_key: SecretString,

    /// Project/workspace the prompts live under.
    #[serde(default)]
    pub project: Option<String>,

    /// Development override: when set, the coverage prompt is read from this
    /// local file instead of being pulled from the registry.
    #[serde(default)]
    pub local_coverage_prompt_path: Option<std::path::PathBuf>,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        PromptsConfig {
            api_key: default_secret(),
            project: None,
            local_coverage_prompt_path: None,
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}
