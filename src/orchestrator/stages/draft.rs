//! §4.6 Draft: produce the user-visible reply and a response kind.

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::llm::{generate_structured, types::Message};
use crate::orchestrator::dependencies::RunDependencies;
use crate::orchestrator::formatting::{format_available_data, format_conversation, format_user_details};
use crate::prompts::PromptName;
use crate::state::{DraftRecord, EscalationSource, Node, ResponseType, RunState};

#[derive(Debug, Deserialize)]
struct RawDraftResponse {
    response: String,
    response_type: ResponseType,
    #[serde(default)]
    escalation_reason: Option<String>,
}

fn draft_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "response": {"type": "string"},
            "response_type": {"type": "string", "enum": ["REPLY", "ROUTE_TO_TEAM"]},
            "escalation_reason": {"type": "string"}
        },
        "required": ["response", "response_type"]
    })
}

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let start = std::time::Instant::now();

    let coverage_reasoning = state
        .current_hop()
        .and_then(|h| h.coverage.as_ref())
        .map(|c| c.coverage_response.reasoning.clone())
        .unwrap_or_default();

    let mut values = std::collections::HashMap::new();
    values.insert("conversation", format_conversation(state.subject.as_deref(), &state.messages));
    values.insert("user_details", format_user_details(&state.user_details));
    values.insert("available_data", format_available_data(state));
    values.insert("coverage_reasoning", coverage_reasoning);

    let template = deps.prompts.get_prompt(PromptName::Draft).await;
    let rendered = crate::prompts::render(&template, &values);
    let messages = [Message::system(rendered), Message::user("Draft the reply now.")];

    let raw: RawDraftResponse = match generate_structured(
        deps.llm.drafter.as_ref(),
        &messages,
        "submit_draft",
        "Submit the reply text and response kind",
        draft_schema(),
    )
    .await
    {
        Ok(r) => r,
        Err(e) => {
            state.escalate_with(EscalationSource::Draft, format!("drafter call failed: {e}"));
            return;
        }
    };

    state.draft = Some(DraftRecord {
        response: raw.response,
        response_type: raw.response_type,
        escalation_reason: raw.escalation_reason,
        timestamp: Utc::now(),
        generation_time_ms: start.elapsed().as_millis() as u64,
    });

    state.next_node = Node::Validate;
}
