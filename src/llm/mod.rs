//! The LLM boundary (§6, §9): exactly two named profiles, planner and
//! drafter, both backed by the same OpenRouter provider via rig-core.

mod dry_run;
mod provider;
mod rig_client;
mod structured;
pub mod types;

pub use dry_run::DryRunProvider;
pub use provider::LlmProvider;
pub use rig_client::RigLlmClient;
pub use structured::generate_structured;

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;

/// The two named LLM profiles the orchestrator is allowed to use. Plan and
/// Coverage both reason over accumulated state and use `planner`; Draft uses
/// `drafter`. Both profiles are the same provider/model today (`LlmConfig`
/// carries one model name) but are kept as distinct handles so they can
/// diverge without touching call sites.
#[derive(Clone)]
pub struct LlmProfiles {
    pub planner: Arc<dyn LlmProvider>,
    pub drafter: Arc<dyn LlmProvider>,
}

impl LlmProfiles {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider: Arc<dyn LlmProvider> = if config.dry_run {
            Arc::new(DryRunProvider::new(config.model_name.clone()))
        } else {
            Arc::new(RigLlmClient::new(config)?)
        };

        Ok(LlmProfiles {
            planner: provider.clone(),
            drafter: provider,
        })
    }
}
