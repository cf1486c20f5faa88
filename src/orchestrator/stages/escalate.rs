//! §4.9 Escalate: post a human-facing note. Always proceeds to Finalize.

use tracing::{instrument, warn};

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{EscalateRecord, EscalationSource, Node, RunState};

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let source = state.pending_escalation_source.unwrap_or(EscalationSource::Coverage);
    let reason = state.escalation_reason.clone().unwrap_or_else(|| "unspecified reason".to_string());

    let note = format!("🚨 Escalation: {reason}");
    let note_posted = match deps.platform.post_note(&state.conversation_id, &note).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to post escalation note");
            false
        }
    };

    state.escalate = Some(EscalateRecord { source, reason, note_posted });
    state.next_node = Node::Finalize;
}
