//! §4.1 Initialize: load conversation, user identity, and tool catalog;
//! seed budgets.

use tracing::{error, instrument};

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{EscalationSource, Node, RunState};
use crate::toolserver::build_catalog;

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    if state.conversation_id.trim().is_empty() {
        fail(state, "missing conversation_id");
        return;
    }

    let conversation = match deps.platform.fetch_conversation(&state.conversation_id).await {
        Ok(c) => c,
        Err(e) => {
            fail(state, &format!("failed to load conversation: {e}"));
            return;
        }
    };

    let messages = conversation.to_messages();
    let subject = conversation.subject();
    let has_subject = subject.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false);
    if messages.is_empty() && !has_subject {
        fail(state, "conversation has no messages and no subject");
        return;
    }

    state.messages = messages;
    state.subject = subject;
    state.user_details = conversation.user_details();
    state.melvin_admin_id = deps.platform.admin_id().to_string();

    let tools = match deps.toolserver.list_tools().await {
        Ok(t) => t,
        Err(e) => {
            fail(state, &format!("failed to load tool catalog: {e}"));
            return;
        }
    };
    state.available_tools = build_catalog(tools);

    state.max_hops = deps.max_hops;
    state.max_actions = deps.max_actions;
    state.next_node = Node::Plan;
}

fn fail(state: &mut RunState, reason: &str) {
    error!(reason, "initialize failed");
    state.error = Some(reason.to_string());
    state.escalate_with(EscalationSource::Initialization, reason.to_string());
}
