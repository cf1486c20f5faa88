//! §4.3 Gather: execute the current hop's gather tool calls sequentially
//! against the tool server, filing results into `tool_data`/`docs_data`.

use std::time::Instant;

use tracing::instrument;

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{GatherRecord, Node, RunState, ToolResult};

/// The tool server's documentation-search tool; its results key
/// `docs_data` by query + hop rather than overwriting by tool name.
const DOC_SEARCH_TOOL: &str = "search_talent_docs";

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let hop_number = state.hops.len() as u32;
    let calls = state
        .current_hop()
        .and_then(|h| h.plan.as_ref())
        .map(|p| p.gather_tool_calls.clone())
        .unwrap_or_default();

    let mut results = Vec::with_capacity(calls.len());
    let mut total_ms = 0u64;
    let mut success_count = 0usize;

    for call in &calls {
        let start = Instant::now();
        let outcome = deps.toolserver.call_tool(&call.tool_name, call.parameters.clone()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        total_ms += elapsed_ms;

        let result = match outcome {
            Ok(tool_result) => {
                let payload = tool_result.parsed_payload();
                let success = !tool_result.is_error;
                if success {
                    success_count += 1;
                    file_payload(state, &call.tool_name, &call.parameters, payload.clone(), hop_number);
                }
                ToolResult {
                    tool_name: call.tool_name.clone(),
                    parameters: call.parameters.clone(),
                    success,
                    payload,
                    error: if success { None } else { Some("tool reported an error".to_string()) },
                    execution_time_ms: elapsed_ms,
                }
            }
            Err(e) => ToolResult {
                tool_name: call.tool_name.clone(),
                parameters: call.parameters.clone(),
                success: false,
                payload: None,
                error: Some(e.to_string()),
                execution_time_ms: elapsed_ms,
            },
        };

        results.push(result);
    }

    let success_rate = if results.is_empty() {
        1.0
    } else {
        success_count as f64 / results.len() as f64
    };

    let record = GatherRecord {
        tool_results: results,
        total_execution_time_ms: total_ms,
        success_rate,
        execution_status: if success_rate == 1.0 { "completed".to_string() } else { "partial".to_string() },
    };

    if let Some(hop) = state.current_hop_mut() {
        hop.gather = Some(record);
    }

    state.next_node = Node::Coverage;
}

fn file_payload(
    state: &mut RunState,
    tool_name: &str,
    parameters: &serde_json::Value,
    payload: Option<serde_json::Value>,
    hop_number: u32,
) {
    let Some(payload) = payload else { return };

    if tool_name == DOC_SEARCH_TOOL {
        let query = parameters
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown query");
        state.docs_data.insert(format!("{query} (hop {hop_number})"), payload);
    } else {
        state.tool_data.insert(tool_name.to_string(), payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_search_results_are_keyed_by_query_and_hop() {
        let mut state = RunState::new("c1", 3, 1);
        file_payload(
            &mut state,
            DOC_SEARCH_TOOL,
            &serde_json::json!({"query": "background check"}),
            Some(serde_json::json!({"results": []})),
            2,
        );
        assert!(state.docs_data.contains_key("background check (hop 2)"));
    }

    #[test]
    fn other_tools_overwrite_by_name() {
        let mut state = RunState::new("c1", 3, 1);
        file_payload(&mut state, "get_user_applications", &serde_json::json!({}), Some(serde_json::json!({"applications": []})), 1);
        file_payload(&mut state, "get_user_applications", &serde_json::json!({}), Some(serde_json::json!({"applications": [1]})), 2);
        assert_eq!(state.tool_data.len(), 1);
        assert_eq!(state.tool_data["get_user_applications"]["applications"][0], 1);
    }
}
