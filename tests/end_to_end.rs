//! The six end-to-end scenarios: greeting, status lookup, two-hop
//! escalation, action-then-reply, route-to-team, and validation failure.

mod common;

use common::build_dependencies;
use serde_json::json;
use support_orchestrator::orchestrator::Orchestrator;
use support_orchestrator::state::FinalizeStatus;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_conversation(server: &MockServer, user_message: &str, email: &str) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/conversations/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "conv-1",
            "source": {"subject": null, "body": user_message, "author": {"author_type": "user"}},
            "conversation_parts": {"conversation_parts": []},
            "contacts": {"contacts": [{"name": "Jamie", "email": email}]}
        })))
        .mount(server)
        .await;
}

async fn mock_tool_catalog(server: &MockServer, tools: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/webhook/talent-success/mcp"))
        .and(body_string_contains("tools/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"tools": tools}
        })))
        .mount(server)
        .await;
}

async fn mock_tool_call(server: &MockServer, tool_name: &str, content_json: serde_json::Value, is_error: bool) {
    Mock::given(method("POST"))
        .and(path("/webhook/talent-success/mcp"))
        .and(body_string_contains(format!("\"name\":\"{tool_name}\"")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": {
                "content": [{"type": "text", "text": serde_json::to_string(&content_json).unwrap()}],
                "isError": is_error
            }
        })))
        .mount(server)
        .await;
}

async fn mock_reply_and_note(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/conversations/.*/reply$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "part-1"})))
        .mount(server)
        .await;
}

async fn mock_snooze(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/conversations/.*/parts$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "part-2"})))
        .mount(server)
        .await;
}

async fn mock_attribute_update(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path_regex(r"^/conversations/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "conv-1"})))
        .mount(server)
        .await;
}

async fn mock_validation(server: &MockServer, overall_passed: bool) {
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"overall_passed": overall_passed})))
        .mount(server)
        .await;
}

fn empty_tools() -> serde_json::Value {
    json!([])
}

#[tokio::test]
async fn greeting_flow_succeeds() {
    let (harness, deps) = build_dependencies(
        vec![
            json!({"reasoning": "no data needed", "tool_calls": []}),
            json!({
                "data_sufficient": true,
                "missing_data": [],
                "reasoning": "nothing to gather for a greeting",
                "confidence": 0.9,
                "next_action": "continue"
            }),
        ],
        vec![json!({"response": "Hello! How can I help?", "response_type": "REPLY"})],
    )
    .await;

    mock_conversation(&harness.platform_server, "Hi", "jamie@example.com").await;
    mock_tool_catalog(&harness.toolserver_server, empty_tools()).await;
    mock_reply_and_note(&harness.platform_server).await;
    mock_snooze(&harness.platform_server).await;
    mock_attribute_update(&harness.platform_server).await;
    mock_validation(&harness.validation_server, true).await;

    let orchestrator = Orchestrator::new(deps);
    let outcome = orchestrator.run_conversation("conv-1").await.expect("run succeeds");

    assert_eq!(outcome.status, FinalizeStatus::Success);
    assert_eq!(outcome.hops, 1);
}

#[tokio::test]
async fn status_lookup_flow_succeeds() {
    let tools = json!([
        {"name": "get_user_applications", "description": "fetch applications", "inputSchema": {"type": "object", "properties": {"user_email": {"type": "string"}}, "required": ["user_email"]}}
    ]);

    let (harness, deps) = build_dependencies(
        vec![
            json!({
                "reasoning": "look up application status",
                "tool_calls": [{"tool_name": "get_user_applications", "parameters": {"user_email": "jamie@example.com"}, "reasoning": "fetch applications"}]
            }),
            json!({
                "data_sufficient": true,
                "missing_data": [],
                "reasoning": "found one rejected application",
                "confidence": 0.85,
                "next_action": "continue"
            }),
        ],
        vec![json!({"response": "Your application was rejected.", "response_type": "REPLY"})],
    )
    .await;

    mock_conversation(&harness.platform_server, "What's the status of my application?", "jamie@example.com").await;
    mock_tool_catalog(&harness.toolserver_server, tools).await;
    mock_tool_call(
        &harness.toolserver_server,
        "get_user_applications",
        json!({"applications": [{"status": "Rejected"}]}),
        false,
    )
    .await;
    mock_reply_and_note(&harness.platform_server).await;
    mock_snooze(&harness.platform_server).await;
    mock_attribute_update(&harness.platform_server).await;
    mock_validation(&harness.validation_server, true).await;

    let orchestrator = Orchestrator::new(deps);
    let outcome = orchestrator.run_conversation("conv-1").await.expect("run succeeds");

    assert_eq!(outcome.status, FinalizeStatus::Success);
}

#[tokio::test]
async fn two_hop_escalation_hits_max_hops() {
    let tools = json!([
        {"name": "search_talent_docs", "description": "search docs", "inputSchema": {"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]}},
        {"name": "get_background_check_status", "description": "background check", "inputSchema": {"type": "object", "properties": {}, "required": []}}
    ]);

    let (harness, deps) = build_dependencies(
        vec![
            json!({
                "reasoning": "search docs first",
                "tool_calls": [{"tool_name": "search_talent_docs", "parameters": {"query": "background check"}, "reasoning": "find policy"}]
            }),
            json!({
                "data_sufficient": false,
                "missing_data": ["background-check status"],
                "reasoning": "need background check status",
                "confidence": 0.4,
                "next_action": "gather_more"
            }),
            json!({
                "reasoning": "try the background check tool",
                "tool_calls": [{"tool_name": "get_background_check_status", "parameters": {}, "reasoning": "fetch status"}]
            }),
            json!({
                "data_sufficient": false,
                "missing_data": ["background-check status"],
                "reasoning": "still missing data after hitting the tool failure",
                "confidence": 0.3,
                "next_action": "gather_more"
            }),
        ],
        vec![],
    )
    .await;

    mock_conversation(&harness.platform_server, "Is my background check done?", "jamie@example.com").await;
    mock_tool_catalog(&harness.toolserver_server, tools).await;
    mock_tool_call(&harness.toolserver_server, "search_talent_docs", json!({"results": []}), false).await;
    mock_tool_call(&harness.toolserver_server, "get_background_check_status", json!({"error": "unavailable"}), true).await;
    mock_reply_and_note(&harness.platform_server).await;
    mock_snooze(&harness.platform_server).await;
    mock_attribute_update(&harness.platform_server).await;

    let orchestrator = Orchestrator::new(deps);
    let outcome = orchestrator.run_conversation("conv-1").await.expect("run succeeds");

    assert_eq!(outcome.status, FinalizeStatus::RouteToTeam);
    assert_eq!(outcome.hops, 2);
}

#[tokio::test]
async fn action_then_reply_links_ticket() {
    let tools = json!([
        {"name": "match_and_link_conversation_to_ticket", "description": "link ticket", "inputSchema": {"type": "object", "properties": {"conversation_id": {"type": "string"}}, "required": ["conversation_id"]}}
    ]);

    let (harness, deps) = build_dependencies(
        vec![
            json!({
                "reasoning": "link the conversation",
                "tool_calls": [{"tool_name": "match_and_link_conversation_to_ticket", "parameters": {"conversation_id": "conv-1"}, "reasoning": "user asked to link a ticket"}]
            }),
            json!({
                "data_sufficient": false,
                "missing_data": [],
                "reasoning": "link the ticket before replying",
                "confidence": 0.8,
                "next_action": "execute_action",
                "action_decision": {"action_tool_name": "match_and_link_conversation_to_ticket", "reasoning": "user requested a link"}
            }),
            json!({
                "data_sufficient": true,
                "missing_data": [],
                "reasoning": "ticket linked, ready to reply",
                "confidence": 0.9,
                "next_action": "continue"
            }),
        ],
        vec![json!({"response": "Linked to ticket ABC-123.", "response_type": "REPLY"})],
    )
    .await;

    mock_conversation(&harness.platform_server, "Please link this to a ticket", "jamie@example.com").await;
    mock_tool_catalog(&harness.toolserver_server, tools).await;
    mock_tool_call(
        &harness.toolserver_server,
        "match_and_link_conversation_to_ticket",
        json!({"ticket_id": "ABC-123"}),
        false,
    )
    .await;
    mock_reply_and_note(&harness.platform_server).await;
    mock_snooze(&harness.platform_server).await;
    mock_attribute_update(&harness.platform_server).await;
    mock_validation(&harness.validation_server, true).await;

    let orchestrator = Orchestrator::new(deps);
    let outcome = orchestrator.run_conversation("conv-1").await.expect("run succeeds");

    assert_eq!(outcome.status, FinalizeStatus::Success);
    assert_eq!(outcome.actions_taken, 1);
}

#[tokio::test]
async fn route_to_team_draft_escalates_after_delivery() {
    let (harness, deps) = build_dependencies(
        vec![
            json!({"reasoning": "user wants a human", "tool_calls": []}),
            json!({
                "data_sufficient": true,
                "missing_data": [],
                "reasoning": "no data gathering needed, route to a human",
                "confidence": 0.7,
                "next_action": "continue"
            }),
        ],
        vec![json!({
            "response": "A teammate will follow up.",
            "response_type": "ROUTE_TO_TEAM",
            "escalation_reason": "user asked for a human"
        })],
    )
    .await;

    mock_conversation(&harness.platform_server, "I want to talk to a human", "jamie@example.com").await;
    mock_tool_catalog(&harness.toolserver_server, empty_tools()).await;
    mock_reply_and_note(&harness.platform_server).await;
    mock_snooze(&harness.platform_server).await;
    mock_attribute_update(&harness.platform_server).await;
    mock_validation(&harness.validation_server, true).await;

    let orchestrator = Orchestrator::new(deps);
    let outcome = orchestrator.run_conversation("conv-1").await.expect("run succeeds");

    assert_eq!(outcome.status, FinalizeStatus::RouteToTeam);
}

#[tokio::test]
async fn validation_failure_escalates_without_delivery() {
    let (harness, deps) = build_dependencies(
        vec![
            json!({"reasoning": "no data needed", "tool_calls": []}),
            json!({
                "data_sufficient": true,
                "missing_data": [],
                "reasoning": "ready to draft",
                "confidence": 0.9,
                "next_action": "continue"
            }),
        ],
        vec![json!({"response": "Here is a risky reply.", "response_type": "REPLY"})],
    )
    .await;

    mock_conversation(&harness.platform_server, "Tell me something", "jamie@example.com").await;
    mock_tool_catalog(&harness.toolserver_server, empty_tools()).await;
    mock_reply_and_note(&harness.platform_server).await;
    mock_snooze(&harness.platform_server).await;
    mock_attribute_update(&harness.platform_server).await;
    mock_validation(&harness.validation_server, false).await;

    let orchestrator = Orchestrator::new(deps);
    let outcome = orchestrator.run_conversation("conv-1").await.expect("run succeeds");

    assert_eq!(outcome.status, FinalizeStatus::ValidationFailed);
}
