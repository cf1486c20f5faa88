//! Converts the tool server's `tools/list` response into the orchestrator's
//! internal `ToolSpec` catalog, tagging each tool with a `ToolType`.
//!
//! The tool server itself has no notion of "gather" vs "action" tools - that
//! distinction comes from an explicit whitelist: only
//! `match_and_link_conversation_to_ticket` has side effects, and those
//! effects stay internal to the messaging platform.

use std::collections::HashMap;

use super::protocol::McpTool;
use crate::state::{ToolSpec, ToolType};

/// Tools whose execution has a side effect, and the type of side effect.
/// Anything not listed here is treated as `Gather`.
const ACTION_TOOLS: &[(&str, ToolType)] = &[
    ("match_and_link_conversation_to_ticket", ToolType::InternalAction),
];

pub fn tool_type_for(name: &str) -> ToolType {
    ACTION_TOOLS
        .iter()
        .find(|(tool_name, _)| *tool_name == name)
        .map(|(_, tool_type)| *tool_type)
        .unwrap_or(ToolType::Gather)
}

pub fn build_catalog(tools: Vec<McpTool>) -> HashMap<String, ToolSpec> {
    tools
        .into_iter()
        .map(|tool| {
            let tool_type = tool_type_for(&tool.name);
            let spec = ToolSpec {
                name: tool.name.clone(),
                description: tool.description,
                input_schema: tool.input_schema.as_json_schema(),
                tool_type,
            };
            (tool.name, spec)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolserver::protocol::McpToolInput;

    #[test]
    fn action_tool_is_tagged_internal_action() {
        assert_eq!(
            tool_type_for("match_and_link_conversation_to_ticket"),
            ToolType::InternalAction
        );
        assert_eq!(tool_type_for("get_user_applications"), ToolType::Gather);
    }

    #[test]
    fn catalog_preserves_schema() {
        let tools = vec![McpTool {
            name: "get_user_applications".to_string(),
            description: "look up applications".to_string(),
            input_schema: McpToolInput {
                schema_type: "object".to_string(),
                properties: serde_json::json!({"user_email": {"type": "string"}}),
                required: vec!["user_email".to_string()],
            },
        }];
        let catalog = build_catalog(tools);
        let spec = catalog.get("get_user_applications").unwrap();
        assert_eq!(spec.tool_type, ToolType::Gather);
        assert_eq!(spec.input_schema["required"][0], "user_email");
    }
}
