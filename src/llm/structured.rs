//! Forces a model response through function-calling against a caller-supplied
//! JSON schema and parses the result, per §9's structured-output design
//! note. Callers are still responsible for defensively revalidating the
//! parsed value's enumerations (`next_action`, `response_type`) - this
//! function only guarantees the JSON parsed against the type, not that the
//! model didn't hallucinate an out-of-vocabulary string into a `String`
//! field typed loosely enough to accept it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::provider::LlmProvider;
use super::types::{forced_function_tool, GenerationOptions, Message};
use crate::error::{Error, Result};

pub async fn generate_structured<T: DeserializeOwned>(
    provider: &dyn LlmProvider,
    messages: &[Message],
    function_name: &str,
    function_description: &str,
    schema: Value,
) -> Result<T> {
    let tool = forced_function_tool(function_name, function_description, schema);
    let options = GenerationOptions {
        tools: Some(vec![tool]),
        ..Default::default()
    };

    let response = provider.generate(messages, &options).await?;

    let call = response
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| Error::Provider(format!("model did not return a structured '{function_name}' call")))?;

    serde_json::from_str(&call.function.arguments)
        .map_err(|e| Error::Provider(format!("malformed structured output for '{function_name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{FunctionCall, GenerationOptions as Opts, LlmResponse, LlmToolCall};
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Decision {
        ok: bool,
    }

    struct StubProvider {
        arguments: String,
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn default_model(&self) -> &str {
            "stub"
        }

        async fn generate(&self, _messages: &[Message], _options: &Opts) -> Result<LlmResponse> {
            Ok(LlmResponse {
                id: "1".to_string(),
                model: "stub".to_string(),
                content: String::new(),
                tool_calls: Some(vec![LlmToolCall {
                    id: "call-1".to_string(),
                    function: FunctionCall {
                        name: "decide".to_string(),
                        arguments: self.arguments.clone(),
                    },
                }]),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn parses_structured_output() {
        let provider = StubProvider { arguments: r#"{"ok": true}"#.to_string() };
        let decision: Decision = generate_structured(
            &provider,
            &[Message::user("hi")],
            "decide",
            "decide something",
            serde_json::json!({"type": "object"}),
        )
        .await
        .unwrap();
        assert_eq!(decision, Decision { ok: true });
    }

    #[tokio::test]
    async fn errors_when_no_tool_call_returned() {
        struct NoCallProvider;
        #[async_trait]
        impl LlmProvider for NoCallProvider {
            fn default_model(&self) -> &str {
                "stub"
            }
            async fn generate(&self, _messages: &[Message], _options: &Opts) -> Result<LlmResponse> {
                Ok(LlmResponse {
                    id: "1".to_string(),
                    model: "stub".to_string(),
                    content: "plain text".to_string(),
                    tool_calls: None,
                    usage: None,
                })
            }
        }

        let result: Result<Decision> = generate_structured(
            &NoCallProvider,
            &[Message::user("hi")],
            "decide",
            "decide something",
            serde_json::json!({"type": "object"}),
        )
        .await;
        assert!(result.is_err());
    }
}
