//! Orchestrator budgets and harness configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of Plan → Gather → Coverage hops per run.
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,

    /// Maximum number of side-effecting actions executed per run.
    #[serde(default = "default_max_actions")]
    pub max_actions: u32,

    /// Seconds the conversation is snoozed for in Finalize.
    #[serde(default = "default_snooze_secs")]
    pub snooze_secs: u64,

    /// Size of the bounded worker pool used by the evaluation harness.
    #[serde(default = "default_eval_concurrency")]
    pub eval_concurrency: usize,

    /// Defensive backstop on total stage transitions per run, independent of
    /// `max_hops`/`max_actions`; tripping it indicates a routing bug, not a
    /// conversation that legitimately ran long.
    #[serde(default = "default_max_transitions")]
    pub max_transitions: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            max_hops: default_max_hops(),
            max_actions: default_max_actions(),
            snooze_secs: default_snooze_secs(),
            eval_concurrency: default_eval_concurrency(),
            max_transitions: default_max_transitions(),
        }
    }
}

fn default_max_hops() -> u32 {
    3
}

fn default_max_actions() -> u32 {
    1
}

fn default_snooze_secs() -> u64 {
    300
}

fn default_eval_concurrency() -> usize {
    3
}

fn default_max_transitions() -> u32 {
    64
}
