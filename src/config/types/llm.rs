//! LLM profile configuration.
//!
//! The orchestrator consumes exactly two named profiles of the same
//! underlying provider — "planner" (Plan/Coverage, low temperature) and
//! "drafter" (Draft, higher temperature) — not a general multi-provider
//! abstraction.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the underlying LLM provider.
    #[serde(default = "default_secret")]
    pub api_key: SecretString,

    /// Model identifier shared by both the planner and drafter profiles.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Base URL of the LLM provider's API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout.
    #[serde(default = "default_timeout", with = "humantime_serde::option")]
    pub timeout: Option<std::time::Duration>,

    /// When true, tool calls that would mutate platform state are executed
    /// with `dry_run: true` injected (see the parameter-sanitization table).
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            api_key: default_secret(),
            model_name: default_model_name(),
            base_url: default_base_url(),
            timeout: default_timeout(),
            dry_run: false,
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_timeout() -> Option<std::time::Duration> {
    Some(std::time::Duration::from_secs(60))
}
