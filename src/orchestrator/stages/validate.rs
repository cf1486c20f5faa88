//! §4.7 Validate: call the policy service and always record the raw
//! verdict as an internal note.

use tracing::instrument;

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{EscalationSource, Node, RunState, ValidateRecord};

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let Some(draft) = state.draft.clone() else {
        state.escalate_with(EscalationSource::Validate, "no draft present to validate".to_string());
        return;
    };

    let verdict = deps.validation.validate(&draft.response).await;

    let (overall_passed, raw_verdict) = match &verdict {
        Ok(v) => (v.overall_passed, v.raw.clone()),
        Err(e) => (false, serde_json::json!({"error": e.to_string()})),
    };

    let pretty = serde_json::to_string_pretty(&raw_verdict).unwrap_or_default();
    let summary = if overall_passed { "PASSED" } else { "FAILED" };
    let note = format!("Validation result: {summary}\n\n{pretty}");
    let note_posted = deps.platform.post_note(&state.conversation_id, &note).await.is_ok();

    state.validate = Some(ValidateRecord { overall_passed, raw_verdict, note_posted });

    if overall_passed {
        state.next_node = Node::Response;
    } else {
        state.escalate_with(
            EscalationSource::Validate,
            "response failed policy validation; see the validation note on this conversation".to_string(),
        );
    }
}
