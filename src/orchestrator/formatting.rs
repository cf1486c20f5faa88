//! Shared context-formatting helpers (§4.11) used by Plan, Coverage, and Draft
//! when building their LLM prompts.

use crate::state::{ConversationMessage, HopRecord, Role, RunState, UserDetails};

/// Render the conversation transcript: subject prefix (if any), then
/// numbered `"<N>. <Role>: <content>"` lines with attachments indented
/// underneath.
pub fn format_conversation(subject: Option<&str>, messages: &[ConversationMessage]) -> String {
    let mut out = String::new();

    if let Some(subject) = subject {
        if !subject.is_empty() {
            out.push_str(&format!("Subject: {subject}\n\n"));
        }
    }

    for (i, message) in messages.iter().enumerate() {
        let role = match message.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        out.push_str(&format!("{}. {}: {}\n", i + 1, role, message.content));

        for attachment in &message.attachments {
            out.push_str(&format!(
                "    - {} ({}) {}",
                attachment.name, attachment.content_type, attachment.url
            ));
            if let Some(size) = attachment.filesize {
                out.push_str(&format!(", {size} bytes"));
            }
            if let (Some(w), Some(h)) = (attachment.width, attachment.height) {
                out.push_str(&format!(", {w}x{h}"));
            }
            out.push('\n');
        }
    }

    out
}

/// Render `Name: ... / Email: ...`, or a placeholder when neither is known.
pub fn format_user_details(user_details: &UserDetails) -> String {
    if user_details.name.is_none() && user_details.email.is_none() {
        return "User details: Not available".to_string();
    }

    let mut lines = Vec::new();
    if let Some(name) = &user_details.name {
        lines.push(format!("Name: {name}"));
    }
    if let Some(email) = &user_details.email {
        lines.push(format!("Email: {email}"));
    }
    lines.join("\n")
}

/// Render prior hops into a short digest for Plan's re-planning context:
/// previously executed/failed tools, the last coverage analysis, and
/// accumulated missing-data gaps.
pub fn format_hop_context(hops: &[HopRecord], max_hops: u32) -> String {
    if hops.is_empty() {
        return "No previous context available".to_string();
    }

    let mut previous_tools = Vec::new();
    let mut failed_tools = Vec::new();
    let mut missing_data = Vec::new();
    let mut last_coverage: Option<&str> = None;

    for hop in hops {
        if let Some(gather) = &hop.gather {
            for result in &gather.tool_results {
                if result.success {
                    previous_tools.push(result.tool_name.clone());
                } else {
                    failed_tools.push(result.tool_name.clone());
                }
            }
        }
        if let Some(coverage) = &hop.coverage {
            last_coverage = Some(&coverage.coverage_response.reasoning);
            missing_data.extend(coverage.coverage_response.missing_data.iter().cloned());
        }
    }

    previous_tools.sort();
    previous_tools.dedup();
    failed_tools.sort();
    failed_tools.dedup();

    let mut parts = Vec::new();
    parts.push(format!("- Current hop: {}/{}", hops.len() + 1, max_hops));
    if !previous_tools.is_empty() {
        parts.push(format!("- Previously executed tools: {}", previous_tools.join(", ")));
    }
    if !failed_tools.is_empty() {
        parts.push(format!("- Previously failed tools: {}", failed_tools.join(", ")));
    }
    if let Some(reasoning) = last_coverage {
        parts.push(format!("- Previous coverage reasoning: {reasoning}"));
    }
    if !missing_data.is_empty() {
        parts.push("- Identified data gaps:".to_string());
        for gap in &missing_data {
            parts.push(format!("  * {gap}"));
        }
    }

    parts.join("\n")
}

/// Render accumulated gather/doc data for Coverage and Draft prompts.
pub fn format_available_data(state: &RunState) -> String {
    let mut parts = Vec::new();

    if !state.tool_data.is_empty() {
        parts.push("Tool data:".to_string());
        for (tool, payload) in &state.tool_data {
            parts.push(format!(
                "- {tool}: {}",
                serde_json::to_string(payload).unwrap_or_default()
            ));
        }
    }

    if !state.docs_data.is_empty() {
        parts.push("Documentation search results:".to_string());
        for (query, payload) in &state.docs_data {
            parts.push(format!(
                "- {query}: {}",
                serde_json::to_string(payload).unwrap_or_default()
            ));
        }
    }

    if !state.actions.is_empty() {
        parts.push("Previously executed actions:".to_string());
        for action in &state.actions {
            parts.push(format!(
                "- {} (success={}): {}",
                action.tool_name, action.success, action.audit_note
            ));
        }
    }

    if parts.is_empty() {
        "No data gathered yet".to_string()
    } else {
        parts.join("\n")
    }
}

/// Render the current hop's action-tool proposals (with sanitized parameters
/// already injected) for Coverage's prompt. Coverage may read these but must
/// never alter the parameters.
pub fn format_action_proposals(hop: &HopRecord) -> String {
    let Some(plan) = &hop.plan else {
        return "No action proposals".to_string();
    };
    if plan.action_tool_calls.is_empty() {
        return "No action proposals".to_string();
    }

    plan.action_tool_calls
        .iter()
        .map(|call| {
            format!(
                "- {} (reasoning: {}) params: {}",
                call.tool_name,
                call.reasoning,
                serde_json::to_string(&call.parameters).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
