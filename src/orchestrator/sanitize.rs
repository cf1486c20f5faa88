//! Plan-stage parameter sanitization: the only approved path for trusted
//! identity fields to enter tool arguments.
//!
//! The LLM is never trusted with `user_email`, `conversation_id`, or
//! `dry_run` — these are unconditionally overwritten from state/env before a
//! tool call is retained, then the result is validated against the tool's
//! JSON schema. Per-call failures drop the call rather than failing the hop.

use serde_json::Value;
use tracing::warn;

use crate::orchestrator::schema;
use crate::state::{RunState, ToolCall, ToolSpec};

/// Names of parameters the orchestrator injects unconditionally, and where
/// the trusted value comes from.
pub struct InjectionMap<'a> {
    pub user_email: Option<&'a str>,
    pub conversation_id: &'a str,
    pub dry_run: bool,
}

impl<'a> InjectionMap<'a> {
    pub fn from_state(state: &'a RunState, dry_run: bool) -> Self {
        InjectionMap {
            user_email: state.user_details.email.as_deref(),
            conversation_id: &state.conversation_id,
            dry_run,
        }
    }

    /// The trusted value for an injectable property name, if any. Always
    /// returns a value for a recognized name, even `Value::Null` when no
    /// trusted value is known, so a present-but-untrusted value supplied by
    /// the LLM is always overwritten rather than left alone.
    fn value_for(&self, property: &str) -> Option<Value> {
        match property {
            "user_email" => Some(
                self.user_email
                    .map(|email| Value::String(email.to_string()))
                    .unwrap_or(Value::Null),
            ),
            "conversation_id" => Some(Value::String(self.conversation_id.to_string())),
            "dry_run" => Some(Value::Bool(self.dry_run)),
            _ => None,
        }
    }
}

/// Apply the sanitization pipeline (drop-unknown, inject, validate) to every
/// LLM-proposed tool call, returning only the calls that survive.
pub fn sanitize_tool_calls(
    raw_calls: Vec<ToolCall>,
    catalog: &std::collections::HashMap<String, ToolSpec>,
    injection: &InjectionMap<'_>,
) -> Vec<ToolCall> {
    let mut retained = Vec::with_capacity(raw_calls.len());

    for mut call in raw_calls {
        let Some(spec) = catalog.get(&call.tool_name) else {
            warn!(tool = %call.tool_name, "plan: dropping call to unknown tool");
            continue;
        };

        inject_trusted_parameters(&mut call.parameters, &spec.input_schema, injection);

        if let Err(reason) = schema::validate(&call.parameters, &spec.input_schema) {
            warn!(tool = %call.tool_name, %reason, "plan: dropping call failing schema validation");
            continue;
        }

        retained.push(call);
    }

    retained
}

/// Overwrite (or insert) every schema property whose name is a key in the
/// injection map. Idempotent: sanitizing an already-sanitized object is a
/// no-op, since the injected values are deterministic functions of state.
fn inject_trusted_parameters(parameters: &mut Value, schema: &Value, injection: &InjectionMap<'_>) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    if !parameters.is_object() {
        *parameters = Value::Object(serde_json::Map::new());
    }
    let map = parameters.as_object_mut().expect("coerced to object above");

    for property_name in properties.keys() {
        if let Some(trusted_value) = injection.value_for(property_name) {
            map.insert(property_name.clone(), trusted_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ToolType;
    use serde_json::json;
    use std::collections::HashMap;

    fn applications_tool() -> ToolSpec {
        ToolSpec {
            name: "lookup_applications".to_string(),
            description: "Look up a user's applications".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_email": {"type": "string"},
                    "query": {"type": "string"}
                },
                "required": ["user_email"]
            }),
            tool_type: ToolType::Gather,
        }
    }

    #[test]
    fn injects_trusted_email_overriding_llm_value() {
        let mut catalog = HashMap::new();
        catalog.insert("lookup_applications".to_string(), applications_tool());

        let calls = vec![ToolCall {
            tool_name: "lookup_applications".to_string(),
            parameters: json!({"user_email": "attacker@evil.com", "query": "status"}),
            reasoning: "check status".to_string(),
        }];

        let injection = InjectionMap {
            user_email: Some("real-user@example.com"),
            conversation_id: "conv-1",
            dry_run: false,
        };

        let retained = sanitize_tool_calls(calls, &catalog, &injection);
        assert_eq!(retained.len(), 1);
        assert_eq!(
            retained[0].parameters["user_email"],
            json!("real-user@example.com")
        );
    }

    #[test]
    fn drops_call_to_unknown_tool() {
        let catalog = HashMap::new();
        let calls = vec![ToolCall {
            tool_name: "not_registered".to_string(),
            parameters: json!({}),
            reasoning: "x".to_string(),
        }];
        let injection = InjectionMap {
            user_email: None,
            conversation_id: "conv-1",
            dry_run: false,
        };
        assert!(sanitize_tool_calls(calls, &catalog, &injection).is_empty());
    }

    #[test]
    fn drops_call_failing_schema_after_injection() {
        let mut catalog = HashMap::new();
        catalog.insert("lookup_applications".to_string(), applications_tool());

        // No email known in state and none supplied by the LLM either - the
        // required property stays absent and validation must fail.
        let calls = vec![ToolCall {
            tool_name: "lookup_applications".to_string(),
            parameters: json!({"query": "status"}),
            reasoning: "check status".to_string(),
        }];
        let injection = InjectionMap {
            user_email: None,
            conversation_id: "conv-1",
            dry_run: false,
        };
        assert!(sanitize_tool_calls(calls, &catalog, &injection).is_empty());
    }

    #[test]
    fn untrusted_email_is_nulled_when_no_trusted_value_is_known() {
        let mut catalog = HashMap::new();
        catalog.insert("lookup_applications".to_string(), applications_tool());

        // The LLM supplies a user_email with no trusted value in state to back
        // it; the property must still be overwritten (to null), never left as
        // the attacker-supplied string, so the call fails required-field
        // validation and is dropped rather than passed through untouched.
        let calls = vec![ToolCall {
            tool_name: "lookup_applications".to_string(),
            parameters: json!({"user_email": "attacker@evil.com", "query": "status"}),
            reasoning: "check status".to_string(),
        }];
        let injection = InjectionMap {
            user_email: None,
            conversation_id: "conv-1",
            dry_run: false,
        };
        assert!(sanitize_tool_calls(calls, &catalog, &injection).is_empty());
    }

    #[test]
    fn sanitizing_an_already_sanitized_call_is_a_no_op() {
        let mut catalog = HashMap::new();
        catalog.insert("lookup_applications".to_string(), applications_tool());
        let injection = InjectionMap {
            user_email: Some("real-user@example.com"),
            conversation_id: "conv-1",
            dry_run: false,
        };

        let calls = vec![ToolCall {
            tool_name: "lookup_applications".to_string(),
            parameters: json!({"user_email": "real-user@example.com", "query": "status"}),
            reasoning: "r".to_string(),
        }];
        let once = sanitize_tool_calls(calls.clone(), &catalog, &injection);
        let twice = sanitize_tool_calls(once.clone(), &catalog, &injection);
        assert_eq!(once[0].parameters, twice[0].parameters);
    }
}
