//! §4.4 Coverage: decide the next stage from the LLM's structured analysis,
//! then apply the deterministic overrides that take priority over it.

use serde_json::json;
use tracing::instrument;

use crate::llm::{generate_structured, types::Message};
use crate::orchestrator::dependencies::RunDependencies;
use crate::orchestrator::formatting::{format_action_proposals, format_available_data, format_conversation, format_user_details};
use crate::prompts::PromptName;
use crate::state::{CoverageRecord, CoverageResponse, NextAction, Node, RunState};

fn coverage_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "data_sufficient": {"type": "boolean"},
            "missing_data": {"type": "array", "items": {"type": "string"}},
            "reasoning": {"type": "string"},
            "confidence": {"type": "number"},
            "next_action": {"type": "string", "enum": ["continue", "gather_more", "execute_action", "escalate"]},
            "escalation_reason": {"type": "string"},
            "action_decision": {
                "type": "object",
                "properties": {
                    "action_tool_name": {"type": "string"},
                    "reasoning": {"type": "string"}
                },
                "required": ["action_tool_name", "reasoning"]
            }
        },
        "required": ["data_sufficient", "missing_data", "reasoning", "confidence", "next_action"]
    })
}

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let mut values = std::collections::HashMap::new();
    values.insert("conversation", format_conversation(state.subject.as_deref(), &state.messages));
    values.insert("user_details", format_user_details(&state.user_details));
    values.insert("available_data", format_available_data(state));
    values.insert(
        "action_proposals",
        state.current_hop().map(format_action_proposals).unwrap_or_default(),
    );

    let template = deps.prompts.get_prompt(PromptName::Coverage).await;
    let rendered = crate::prompts::render(&template, &values);
    let messages = [Message::system(rendered), Message::user("Produce the coverage decision for this hop.")];

    let response: CoverageResponse = match generate_structured(
        deps.llm.planner.as_ref(),
        &messages,
        "submit_coverage",
        "Submit the coverage decision for this hop",
        coverage_schema(),
    )
    .await
    {
        Ok(r) => r,
        Err(e) => {
            state.escalate_with(crate::state::EscalationSource::Coverage, format!("coverage call failed: {e}"));
            return;
        }
    };

    let hit_max_hops = response.next_action == NextAction::GatherMore && state.hops.len() as u32 >= state.max_hops;
    let next_action = apply_policy(&response, state);
    let next_node = match next_action {
        NextAction::Continue => Node::Draft,
        NextAction::GatherMore => Node::Plan,
        NextAction::ExecuteAction => Node::Action,
        NextAction::Escalate => Node::Escalate,
    };

    if next_action == NextAction::Escalate {
        let reason = escalation_reason(&response, hit_max_hops, state.max_hops);
        state.escalate_with(crate::state::EscalationSource::Coverage, reason);
    } else {
        state.next_node = next_node;
    }

    let record = CoverageRecord { coverage_response: response, next_node };
    if let Some(hop) = state.current_hop_mut() {
        hop.coverage = Some(record);
    }
}

/// The deterministic overrides from §4.4, applied over the LLM's raw
/// `next_action`. Returns the action actually taken, which may differ from
/// `response.next_action`.
fn apply_policy(response: &CoverageResponse, state: &RunState) -> NextAction {
    match response.next_action {
        NextAction::GatherMore if state.hops.len() as u32 >= state.max_hops => NextAction::Escalate,
        NextAction::ExecuteAction if state.actions_taken >= state.max_actions => NextAction::Continue,
        NextAction::ExecuteAction => {
            let valid = response
                .action_decision
                .as_ref()
                .and_then(|decision| {
                    state
                        .current_hop()
                        .and_then(|h| h.plan.as_ref())
                        .map(|p| p.action_tool_calls.iter().any(|c| c.tool_name == decision.action_tool_name))
                })
                .unwrap_or(false);
            if valid {
                NextAction::ExecuteAction
            } else {
                NextAction::Continue
            }
        }
        other => other,
    }
}

/// The escalation reason to record. On the max-hops override path this is a
/// fixed message naming the hop limit, not whatever reason the LLM gave for
/// its original (overridden) `next_action`.
fn escalation_reason(response: &CoverageResponse, hit_max_hops: bool, max_hops: u32) -> String {
    if hit_max_hops {
        format!("Exceeded maximum hops ({max_hops}). Unable to gather sufficient data.")
    } else {
        response
            .escalation_reason
            .clone()
            .unwrap_or_else(|| "coverage escalated without a reason".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActionDecision, HopRecord, PlanRecord, ToolCall};

    fn response(next_action: NextAction) -> CoverageResponse {
        CoverageResponse {
            data_sufficient: false,
            missing_data: vec![],
            reasoning: "r".to_string(),
            confidence: 0.5,
            next_action,
            escalation_reason: None,
            action_decision: None,
        }
    }

    #[test]
    fn max_hops_escalation_reason_names_the_limit() {
        let mut resp = response(NextAction::GatherMore);
        resp.escalation_reason = Some("unrelated LLM reason".to_string());
        assert_eq!(
            escalation_reason(&resp, true, 2),
            "Exceeded maximum hops (2). Unable to gather sufficient data."
        );
    }

    #[test]
    fn non_max_hops_escalation_uses_llm_reason() {
        let mut resp = response(NextAction::Escalate);
        resp.escalation_reason = Some("user requested a refund outside policy".to_string());
        assert_eq!(
            escalation_reason(&resp, false, 2),
            "user requested a refund outside policy"
        );
    }

    #[test]
    fn gather_more_at_max_hops_escalates() {
        let mut state = RunState::new("c1", 2, 1);
        state.hops.push(HopRecord::new(1));
        state.hops.push(HopRecord::new(2));
        assert_eq!(apply_policy(&response(NextAction::GatherMore), &state), NextAction::Escalate);
    }

    #[test]
    fn execute_action_past_budget_continues() {
        let mut state = RunState::new("c1", 3, 1);
        state.actions_taken = 1;
        assert_eq!(apply_policy(&response(NextAction::ExecuteAction), &state), NextAction::Continue);
    }

    #[test]
    fn execute_action_naming_unknown_tool_continues() {
        let mut state = RunState::new("c1", 3, 1);
        let mut hop = HopRecord::new(1);
        hop.plan = Some(PlanRecord {
            reasoning: "r".to_string(),
            tool_calls: vec![],
            gather_tool_calls: vec![],
            action_tool_calls: vec![ToolCall { tool_name: "link_ticket".to_string(), parameters: serde_json::json!({}), reasoning: "r".to_string() }],
        });
        state.hops.push(hop);

        let mut resp = response(NextAction::ExecuteAction);
        resp.action_decision = Some(ActionDecision { action_tool_name: "not_planned".to_string(), reasoning: "x".to_string() });
        assert_eq!(apply_policy(&resp, &state), NextAction::Continue);

        resp.action_decision = Some(ActionDecision { action_tool_name: "link_ticket".to_string(), reasoning: "x".to_string() });
        assert_eq!(apply_policy(&resp, &state), NextAction::ExecuteAction);
    }
}
