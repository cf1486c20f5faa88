//! The adapter handles every stage needs, assembled once per orchestrator
//! instance and threaded through the dispatch loop as `&RunDependencies`.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::llm::LlmProfiles;
use crate::platform::PlatformClient;
use crate::prompts::PromptRegistry;
use crate::toolserver::ToolServerClient;
use crate::validation_service::ValidationServiceClient;

pub struct RunDependencies {
    pub platform: Arc<PlatformClient>,
    pub toolserver: Arc<ToolServerClient>,
    pub validation: Arc<ValidationServiceClient>,
    pub llm: LlmProfiles,
    pub prompts: Arc<PromptRegistry>,
    pub max_hops: u32,
    pub max_actions: u32,
    pub max_transitions: u32,
    pub snooze_secs: u64,
    pub dry_run: bool,
}

impl RunDependencies {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(RunDependencies {
            platform: Arc::new(PlatformClient::new(&config.platform)?),
            toolserver: Arc::new(ToolServerClient::new(&config.toolserver)?),
            validation: Arc::new(ValidationServiceClient::new(&config.validation_service)?),
            llm: LlmProfiles::from_config(&config.llm)?,
            prompts: Arc::new(PromptRegistry::new(&config.prompts)?),
            max_hops: config.orchestrator.max_hops,
            max_actions: config.orchestrator.max_actions,
            max_transitions: config.orchestrator.max_transitions,
            snooze_secs: config.orchestrator.snooze_secs,
            dry_run: config.llm.dry_run,
        })
    }
}
