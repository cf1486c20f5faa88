//! §4.2 Plan: produce the current hop's tool calls via structured
//! function-calling, then sanitize and split them into gather/action lists.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::llm::{generate_structured, types::Message};
use crate::orchestrator::dependencies::RunDependencies;
use crate::orchestrator::formatting::{format_conversation, format_hop_context, format_user_details};
use crate::orchestrator::sanitize::{sanitize_tool_calls, InjectionMap};
use crate::prompts::PromptName;
use crate::state::{EscalationSource, HopRecord, Node, PlanRecord, RunState, ToolCall};

#[derive(Debug, Deserialize)]
struct RawPlanResponse {
    reasoning: String,
    tool_calls: Vec<ToolCall>,
}

fn plan_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "reasoning": {"type": "string"},
            "tool_calls": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "tool_name": {"type": "string"},
                        "parameters": {"type": "object"},
                        "reasoning": {"type": "string"}
                    },
                    "required": ["tool_name", "parameters", "reasoning"]
                }
            }
        },
        "required": ["reasoning", "tool_calls"]
    })
}

fn tool_catalog_text(state: &RunState) -> String {
    state
        .available_tools
        .values()
        .map(|tool| {
            format!(
                "- {} [{:?}]: {}\n  schema: {}",
                tool.name,
                tool.tool_type,
                tool.description,
                serde_json::to_string(&tool.input_schema).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[instrument(skip_all, fields(conversation_id = %state.conversation_id, hop = state.hops.len() + 1))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let hop_number = state.hops.len() as u32 + 1;
    state.hops.push(HopRecord::new(hop_number));

    let mut values = std::collections::HashMap::new();
    values.insert("conversation", format_conversation(state.subject.as_deref(), &state.messages));
    values.insert("user_details", format_user_details(&state.user_details));
    values.insert("hop_context", format_hop_context(&state.hops[..state.hops.len() - 1], state.max_hops));
    values.insert(
        "selected_procedure",
        state.selected_procedure.clone().unwrap_or_else(|| "None".to_string()),
    );
    values.insert("tool_catalog", tool_catalog_text(state));

    let template = deps.prompts.get_prompt(PromptName::Plan).await;
    let mut rendered = crate::prompts::render(&template, &values);
    rendered.push_str("\n\nAvailable tools:\n");
    rendered.push_str(&values["tool_catalog"]);

    let messages = [Message::system(rendered), Message::user("Produce the plan for this hop.")];

    let raw: RawPlanResponse = match generate_structured(
        deps.llm.planner.as_ref(),
        &messages,
        "submit_plan",
        "Submit the reasoning and tool calls for this hop",
        plan_schema(),
    )
    .await
    {
        Ok(r) => r,
        Err(e) => {
            state.escalate_with(EscalationSource::Plan, format!("planner call failed: {e}"));
            return;
        }
    };

    let injection = InjectionMap::from_state(state, deps.dry_run);
    let sanitized = sanitize_tool_calls(raw.tool_calls, &state.available_tools, &injection);

    let (gather, action): (Vec<ToolCall>, Vec<ToolCall>) = sanitized
        .iter()
        .cloned()
        .partition(|call| {
            state
                .available_tools
                .get(&call.tool_name)
                .map(|spec| !spec.tool_type.is_action())
                .unwrap_or(true)
        });

    let record = PlanRecord {
        reasoning: raw.reasoning,
        tool_calls: sanitized,
        gather_tool_calls: gather,
        action_tool_calls: action,
    };

    if let Some(hop) = state.current_hop_mut() {
        hop.plan = Some(record);
    }

    state.next_node = Node::Gather;
}
