//! Configuration types module
//!
//! Each external collaborator gets its own focused config type, loaded from
//! environment variables and optionally overridden by a config file.

pub mod llm;
pub mod orchestrator;
pub mod platform;
pub mod prompts;
pub mod toolserver;
pub mod validation_service;

use serde::{Deserialize, Serialize};

/// Top-level run configuration, aggregating every external collaborator's
/// settings plus the orchestrator's own budgets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: platform::PlatformConfig,
    #[serde(default)]
    pub toolserver: toolserver::ToolServerConfig,
    #[serde(default)]
    pub validation_service: validation_service::ValidationServiceConfig,
    #[serde(default)]
    pub llm: llm::LlmConfig,
    #[serde(default)]
    pub prompts: prompts::PromptsConfig,
    #[serde(default)]
    pub orchestrator: orchestrator::OrchestratorConfig,
}

impl Config {
    /// Load configuration from environment variables and an optional `.env` file.
    pub fn from_env() -> crate::error::Result<Self> {
        crate::config::load_config()
    }
}
