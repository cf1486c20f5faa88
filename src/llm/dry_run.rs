//! A canned provider used when `DRY_RUN=1`: echoes back a minimal structured
//! response satisfying whatever tool schema it was asked to call, so the
//! orchestrator can be exercised end-to-end without live model credentials.

use async_trait::async_trait;

use super::provider::LlmProvider;
use super::types::{GenerationOptions, LlmResponse, LlmToolCall, FunctionCall, Message};
use crate::error::Result;

pub struct DryRunProvider {
    model_name: String,
}

impl DryRunProvider {
    pub fn new(model_name: impl Into<String>) -> Self {
        DryRunProvider { model_name: model_name.into() }
    }
}

#[async_trait]
impl LlmProvider for DryRunProvider {
    fn default_model(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, _messages: &[Message], options: &GenerationOptions) -> Result<LlmResponse> {
        let tool_calls = options.tools.as_ref().map(|tools| {
            tools
                .iter()
                .map(|tool| LlmToolCall {
                    id: format!("dry-run-{}", tool.function.name),
                    function: FunctionCall {
                        name: tool.function.name.clone(),
                        arguments: dry_run_arguments(&tool.function.parameters),
                    },
                })
                .collect()
        });

        Ok(LlmResponse {
            id: "dry-run".to_string(),
            model: self.model_name.clone(),
            content: "[dry run]".to_string(),
            tool_calls,
            usage: None,
        })
    }
}

/// Produce a value satisfying `schema`'s required properties with
/// conservative placeholders, so schema validation downstream still passes.
fn dry_run_arguments(schema: &serde_json::Value) -> String {
    let mut object = serde_json::Map::new();
    if let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) {
        for (key, prop_schema) in properties {
            let value = match prop_schema.get("type").and_then(|t| t.as_str()) {
                Some("boolean") => serde_json::Value::Bool(false),
                Some("number") | Some("integer") => serde_json::Value::from(0),
                Some("array") => serde_json::Value::Array(vec![]),
                Some("object") => serde_json::Value::Object(serde_json::Map::new()),
                _ => {
                    if let Some(enum_values) = prop_schema.get("enum").and_then(|v| v.as_array()) {
                        enum_values.first().cloned().unwrap_or(serde_json::Value::Null)
                    } else {
                        serde_json::Value::String(format!("dry-run-{key}"))
                    }
                }
            };
            object.insert(key.clone(), value);
        }
    }
    serde_json::Value::Object(object).to_string()
}
