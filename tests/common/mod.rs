//! Shared test fixtures: a scripted `LlmProvider` double and helpers to
//! assemble a `RunDependencies` wired against `wiremock` servers for the
//! platform, tool server, and validation service.
//!
//! The prompt registry is *not* mocked: its registry endpoint is a fixed
//! `https://api.smith.langchain.com` URL, so in an offline test run every
//! fetch fails and `PromptRegistry::get_prompt` falls back to the built-in
//! default text. That fallback is itself part of the registry's contract
//! (see `src/prompts/registry.rs`), so exercising it here is honest rather
//! than a workaround.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use support_orchestrator::config::{
    OrchestratorConfig, PlatformConfig, PromptsConfig, ToolServerConfig, ValidationServiceConfig,
};
use support_orchestrator::error::Result;
use support_orchestrator::llm::types::{GenerationOptions, LlmResponse, LlmToolCall, Message};
use support_orchestrator::llm::{LlmProfiles, LlmProvider};
use support_orchestrator::orchestrator::RunDependencies;
use support_orchestrator::platform::PlatformClient;
use support_orchestrator::prompts::PromptRegistry;
use support_orchestrator::toolserver::ToolServerClient;
use support_orchestrator::validation_service::ValidationServiceClient;
use tokio::sync::Mutex;
use wiremock::MockServer;

/// Returns one queued JSON value per call, as the arguments of whichever
/// single forced function the caller requested.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<serde_json::Value>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<serde_json::Value>) -> Arc<Self> {
        Arc::new(ScriptedProvider { queue: Mutex::new(responses.into_iter().collect()) })
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn default_model(&self) -> &str {
        "scripted-test-model"
    }

    async fn generate(&self, _messages: &[Message], options: &GenerationOptions) -> Result<LlmResponse> {
        let mut queue = self.queue.lock().await;
        let arguments = queue
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider ran out of queued responses"));

        let function_name = options
            .tools
            .as_ref()
            .and_then(|tools| tools.first())
            .map(|t| t.function.name.clone())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(LlmResponse {
            id: "scripted-response".to_string(),
            model: "scripted-test-model".to_string(),
            content: String::new(),
            tool_calls: Some(vec![LlmToolCall {
                id: "call-1".to_string(),
                function: support_orchestrator::llm::types::FunctionCall {
                    name: function_name,
                    arguments: serde_json::to_string(&arguments).expect("scripted argument serializes"),
                },
            }]),
            usage: None,
        })
    }
}

pub struct TestHarness {
    pub platform_server: MockServer,
    pub toolserver_server: MockServer,
    pub validation_server: MockServer,
}

/// Build `RunDependencies` pointed at fresh wiremock servers for platform,
/// tool server, and validation, with the given scripted planner/drafter
/// responses queued in call order.
pub async fn build_dependencies(
    planner_responses: Vec<serde_json::Value>,
    drafter_responses: Vec<serde_json::Value>,
) -> (TestHarness, RunDependencies) {
    let platform_server = MockServer::start().await;
    let toolserver_server = MockServer::start().await;
    let validation_server = MockServer::start().await;

    let platform_config = PlatformConfig {
        api_key: secrecy::SecretString::from("test-platform-key".to_string()),
        admin_id: "admin-1".to_string(),
        base_url: platform_server.uri(),
        api_version: "2.14".to_string(),
        timeout: Some(std::time::Duration::from_secs(5)),
        max_retries: 3,
    };

    let toolserver_config = ToolServerConfig {
        base_url: toolserver_server.uri(),
        auth_token: secrecy::SecretString::from("test-tool-key".to_string()),
        path: "/webhook/talent-success/mcp".to_string(),
        timeout: Some(std::time::Duration::from_secs(5)),
    };

    let validation_config = ValidationServiceConfig {
        endpoint: format!("{}/validate", validation_server.uri()),
        api_key: secrecy::SecretString::from("test-validation-key".to_string()),
        timeout: Some(std::time::Duration::from_secs(5)),
    };

    let prompts_config = PromptsConfig {
        api_key: secrecy::SecretString::from("unused".to_string()),
        project: Some("test-project".to_string()),
        local_coverage_prompt_path: None,
    };

    let orchestrator_config = OrchestratorConfig {
        max_hops: 2,
        max_actions: 1,
        snooze_secs: 300,
        eval_concurrency: 3,
        max_transitions: 64,
    };

    let deps = RunDependencies {
        platform: Arc::new(PlatformClient::new(&platform_config).expect("platform client")),
        toolserver: Arc::new(ToolServerClient::new(&toolserver_config).expect("tool server client")),
        validation: Arc::new(ValidationServiceClient::new(&validation_config).expect("validation client")),
        llm: LlmProfiles {
            planner: ScriptedProvider::new(planner_responses),
            drafter: ScriptedProvider::new(drafter_responses),
        },
        prompts: Arc::new(PromptRegistry::new(&prompts_config).expect("prompt registry")),
        max_hops: orchestrator_config.max_hops,
        max_actions: orchestrator_config.max_actions,
        max_transitions: orchestrator_config.max_transitions,
        snooze_secs: orchestrator_config.snooze_secs,
        dry_run: false,
    };

    (TestHarness { platform_server, toolserver_server, validation_server }, deps)
}
