//! §4.5 Action: execute exactly one side-effecting tool - the one named by
//! Coverage, with the parameters Plan already sanitized - and post an audit
//! note.

use std::time::Instant;

use chrono::Utc;
use tracing::instrument;

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{ActionRecord, EscalationSource, Node, RunState};

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let hop_number = state.hops.len() as u32;

    let Some(action_tool_name) = state
        .current_hop()
        .and_then(|h| h.coverage.as_ref())
        .and_then(|c| c.coverage_response.action_decision.as_ref())
        .map(|d| d.action_tool_name.clone())
    else {
        state.escalate_with(EscalationSource::Action, "no action decision present for this hop".to_string());
        return;
    };

    let Some(call) = state
        .current_hop()
        .and_then(|h| h.plan.as_ref())
        .and_then(|p| p.action_tool_calls.iter().find(|c| c.tool_name == action_tool_name).cloned())
    else {
        state.escalate_with(
            EscalationSource::Action,
            format!("action tool '{action_tool_name}' not found in this hop's plan"),
        );
        return;
    };

    let start = Instant::now();
    let outcome = deps.toolserver.call_tool(&call.tool_name, call.parameters.clone()).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let (success, payload, error) = match outcome {
        Ok(result) if !result.is_error => (true, result.parsed_payload(), None),
        Ok(result) => (false, result.parsed_payload(), Some("tool reported an error".to_string())),
        Err(e) => (false, None, Some(e.to_string())),
    };

    let audit_note = render_audit_note(&call.tool_name, &call.parameters, payload.as_ref(), elapsed_ms, success, error.as_deref());

    let record = ActionRecord {
        hop_number,
        tool_name: call.tool_name.clone(),
        parameters: call.parameters.clone(),
        tool_result: payload,
        execution_time_ms: elapsed_ms,
        success,
        error: error.clone(),
        audit_note: audit_note.clone(),
        timestamp: Utc::now(),
    };
    state.actions.push(record);
    state.actions_taken += 1;

    if let Err(e) = deps.platform.post_note(&state.conversation_id, &audit_note).await {
        tracing::warn!(error = %e, "failed to post action audit note");
    }

    if success {
        state.next_node = Node::Coverage;
    } else {
        state.escalate_with(
            EscalationSource::Action,
            format!("action '{}' failed: {}", call.tool_name, error.unwrap_or_default()),
        );
    }
}

fn render_audit_note(
    tool_name: &str,
    parameters: &serde_json::Value,
    payload: Option<&serde_json::Value>,
    execution_time_ms: u64,
    success: bool,
    error: Option<&str>,
) -> String {
    let mut note = format!("Action executed: {tool_name}\nParameters: {}\n", serde_json::to_string(parameters).unwrap_or_default());
    note.push_str(&format!("Duration: {execution_time_ms}ms\n"));
    if success {
        note.push_str("Result: success\n");
        if let Some(payload) = payload {
            note.push_str(&format!("Data: {}\n", serde_json::to_string(payload).unwrap_or_default()));
        }
    } else {
        note.push_str(&format!("Result: failed ({})\n", error.unwrap_or("unknown error")));
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_note_mentions_failure_reason() {
        let note = render_audit_note("link_ticket", &serde_json::json!({}), None, 10, false, Some("timeout"));
        assert!(note.contains("timeout"));
        assert!(note.contains("failed"));
    }
}
