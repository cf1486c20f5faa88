//! The bounded multi-hop state machine that drives one conversation from
//! Initialize through Finalize.

pub mod dependencies;
pub mod formatting;
pub mod sanitize;
pub mod schema;
pub mod stages;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};

use crate::config::Config;
use crate::error::Result;
use crate::state::{FinalizeStatus, Node, RunState};

pub use dependencies::RunDependencies;

/// A hard backstop against an unanticipated routing cycle, independent of
/// `max_hops`/`max_actions`. Tripping this indicates a driver bug, not a
/// conversation that legitimately ran long.
const MAX_TRANSITIONS_CEILING: u32 = 200;

/// The terminal summary returned to a caller of [`Orchestrator::run_conversation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub conversation_id: String,
    pub status: FinalizeStatus,
    pub hops: usize,
    pub actions_taken: u32,
    pub duration_ms: u64,
}

pub struct Orchestrator {
    deps: RunDependencies,
}

impl Orchestrator {
    pub fn new(deps: RunDependencies) -> Self {
        Orchestrator { deps }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Orchestrator { deps: RunDependencies::from_config(config)? })
    }

    /// Run a single conversation from Initialize through Finalize/Done.
    #[tracing::instrument(skip(self), fields(conversation_id = %conversation_id))]
    pub async fn run_conversation(&self, conversation_id: &str) -> Result<RunOutcome> {
        let started = Instant::now();
        let max_hops = self.deps.max_hops;
        let max_actions = self.deps.max_actions;
        let transition_ceiling = self.deps.max_transitions.min(MAX_TRANSITIONS_CEILING).max(1);

        let mut state = RunState::new(conversation_id, max_hops, max_actions);
        let mut transitions: u32 = 0;

        loop {
            if transitions >= transition_ceiling {
                error!(
                    transitions,
                    ceiling = transition_ceiling,
                    "orchestrator hit the defensive transition ceiling; forcing finalize"
                );
                state.error = Some("exceeded maximum state transitions".to_string());
                stages::finalize::run(&mut state, &self.deps)
                    .instrument(info_span!("stage", name = "finalize", conversation_id = %state.conversation_id))
                    .await;
                break;
            }

            let node = state.next_node;
            let hop = state.hops.len();

            let span = info_span!("stage", name = ?node, conversation_id = %state.conversation_id, hop);
            match node {
                Node::Initialize => stages::initialize::run(&mut state, &self.deps).instrument(span).await,
                Node::Plan => stages::plan::run(&mut state, &self.deps).instrument(span).await,
                Node::Gather => stages::gather::run(&mut state, &self.deps).instrument(span).await,
                Node::Coverage => stages::coverage::run(&mut state, &self.deps).instrument(span).await,
                Node::Action => stages::action::run(&mut state, &self.deps).instrument(span).await,
                Node::Draft => stages::draft::run(&mut state, &self.deps).instrument(span).await,
                Node::Validate => stages::validate::run(&mut state, &self.deps).instrument(span).await,
                Node::Response => stages::response::run(&mut state, &self.deps).instrument(span).await,
                Node::Escalate => stages::escalate::run(&mut state, &self.deps).instrument(span).await,
                Node::Finalize => stages::finalize::run(&mut state, &self.deps).instrument(span).await,
                Node::Done => break,
            }

            transitions += 1;
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        let status = state
            .finalize
            .as_ref()
            .map(|f| f.status)
            .unwrap_or(FinalizeStatus::Error);

        info!(
            status = status.as_attribute_value(),
            hops = state.hops.len(),
            actions_taken = state.actions_taken,
            duration_ms,
            "conversation run finished"
        );

        Ok(RunOutcome {
            conversation_id: state.conversation_id,
            status,
            hops: state.hops.len(),
            actions_taken: state.actions_taken,
            duration_ms,
        })
    }
}
