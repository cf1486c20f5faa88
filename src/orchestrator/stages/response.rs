//! §4.8 Response: deliver the reply, then route to Escalate (for
//! ROUTE_TO_TEAM drafts) or Finalize.

use tracing::instrument;

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{EscalationSource, Node, ResponseDeliveryRecord, ResponseType, RunState};

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let Some(draft) = state.draft.clone() else {
        state.escalate_with(EscalationSource::Response, "no draft present to deliver".to_string());
        return;
    };

    match deps.platform.post_reply(&state.conversation_id, &draft.response).await {
        Ok(()) => {
            state.response_delivery = Some(ResponseDeliveryRecord { delivered: true, error: None });
            if draft.response_type == ResponseType::RouteToTeam {
                let reason = draft
                    .escalation_reason
                    .clone()
                    .unwrap_or_else(|| "drafted response routes to a human team".to_string());
                state.escalate_with(EscalationSource::Response, reason);
            } else {
                state.next_node = Node::Finalize;
            }
        }
        Err(e) => {
            state.response_delivery = Some(ResponseDeliveryRecord { delivered: false, error: Some(e.to_string()) });
            state.escalate_with(EscalationSource::Response, format!("failed to deliver reply: {e}"));
        }
    }
}
