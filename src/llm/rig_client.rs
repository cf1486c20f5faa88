//! rig-core OpenRouter wrapper implementing `LlmProvider`.
//!
//! Builds one rig-core OpenRouter completion model and issues non-streaming
//! completion requests with arbitrary forced-function tool definitions, so
//! callers get back a single structured tool call instead of free-form text.

use rig::completion::CompletionModel;
use rig::providers::openrouter;
use rig::OneOrMany;
use secrecy::ExposeSecret;

use super::provider::LlmProvider;
use super::types::{FunctionCall, GenerationOptions, LlmResponse, LlmToolCall, Message, Role, UsageStats};
use crate::config::LlmConfig;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct RigLlmClient {
    client: openrouter::Client,
    model_name: String,
}

impl RigLlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = openrouter::Client::new(config.api_key.expose_secret())
            .map_err(|e| Error::Config(format!("failed to create OpenRouter client: {e}")))?;
        Ok(RigLlmClient {
            client,
            model_name: config.model_name.clone(),
        })
    }

    fn completion_model(&self, model: &str) -> openrouter::CompletionModel {
        self.client.completion_model(model)
    }
}

#[async_trait::async_trait]
impl LlmProvider for RigLlmClient {
    fn default_model(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, messages: &[Message], options: &GenerationOptions) -> Result<LlmResponse> {
        let model = self.model_name.clone();

        let rig_messages: Vec<openrouter::completion::Message> = messages
            .iter()
            .map(|msg| match msg.role {
                Role::System => openrouter::completion::Message::system(&msg.content),
                Role::User => openrouter::completion::Message::User {
                    content: OneOrMany::one(msg.content.clone().into()),
                    name: None,
                },
                Role::Assistant => openrouter::completion::Message::Assistant {
                    content: vec![rig::providers::openai::AssistantContent::Text {
                        text: msg.content.clone(),
                    }],
                    refusal: None,
                    audio: None,
                    name: None,
                    tool_calls: vec![],
                    reasoning: None,
                    reasoning_details: vec![],
                },
            })
            .collect();

        let mut request = self.completion_model(&model).completion_request(rig_messages);

        if let Some(max_tokens) = options.max_tokens {
            request = request.max_tokens(max_tokens as usize);
        }
        if let Some(temperature) = options.temperature {
            request = request.temperature(temperature as f64);
        }
        if let Some(tools) = &options.tools {
            for tool in tools {
                request = request.tool(rig::completion::ToolDefinition {
                    name: tool.function.name.clone(),
                    description: tool.function.description.clone(),
                    parameters: tool.function.parameters.clone(),
                });
            }
            // Force the model to answer via a tool call rather than free text.
            request = request.tool_choice(rig::completion::ToolChoice::Required);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Provider(format!("OpenRouter completion failed: {e}")))?;

        let content = response.choice.to_content();
        let tool_calls = extract_tool_calls(&response.choice);

        Ok(LlmResponse {
            id: format!("openrouter-{}", uuid::Uuid::new_v4()),
            model,
            content,
            tool_calls,
            usage: Some(UsageStats {
                prompt_tokens: response.usage.input_tokens as u32,
                completion_tokens: response.usage.output_tokens as u32,
                total_tokens: response.usage.total_tokens as u32,
            }),
        })
    }
}

fn extract_tool_calls(
    choice: &OneOrMany<rig::providers::openai::AssistantContent>,
) -> Option<Vec<LlmToolCall>> {
    let calls: Vec<LlmToolCall> = choice
        .iter()
        .filter_map(|item| match item {
            rig::providers::openai::AssistantContent::ToolCall(call) => Some(LlmToolCall {
                id: call.id.clone(),
                function: FunctionCall {
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.to_string(),
                },
            }),
            _ => None,
        })
        .collect();

    if calls.is_empty() {
        None
    } else {
        Some(calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn client_construction_succeeds() {
        let config = LlmConfig {
            api_key: SecretString::from("test-key".to_string()),
            model_name: "gpt-4o-mini".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout: None,
            dry_run: false,
        };
        assert!(RigLlmClient::new(&config).is_ok());
    }
}
