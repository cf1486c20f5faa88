//! Prompt source of truth: fetches Plan/Coverage/Draft prompt text from a
//! LangSmith-shaped prompt registry, with a local-file override for the
//! coverage prompt and static fallbacks if the registry call fails.

use std::path::PathBuf;

use secrecy::ExposeSecret;
use tracing::warn;

use super::defaults;
use crate::config::PromptsConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptName {
    Plan,
    Coverage,
    Draft,
}

impl PromptName {
    /// The name this prompt is registered under in the registry.
    fn registry_name(self) -> &'static str {
        match self {
            PromptName::Plan => "agent-plan-prompt",
            PromptName::Coverage => "agent-coverage-prompt",
            PromptName::Draft => "agent-draft-prompt",
        }
    }

    fn default_text(self) -> &'static str {
        match self {
            PromptName::Plan => defaults::PLAN_PROMPT,
            PromptName::Coverage => defaults::COVERAGE_PROMPT,
            PromptName::Draft => defaults::DRAFT_PROMPT,
        }
    }
}

pub struct PromptRegistry {
    http: reqwest::Client,
    api_key: secrecy::SecretString,
    project: String,
    local_coverage_prompt_path: Option<PathBuf>,
}

impl PromptRegistry {
    pub fn new(config: &PromptsConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(PromptRegistry {
            http,
            api_key: config.api_key.clone(),
            project: config
                .project
                .clone()
                .unwrap_or_else(|| "application-status-agent".to_string()),
            local_coverage_prompt_path: config.local_coverage_prompt_path.clone(),
        })
    }

    /// Fetch a prompt's template text, falling back to the built-in default
    /// on any registry failure (network, auth, missing prompt).
    pub async fn get_prompt(&self, name: PromptName) -> String {
        if name == PromptName::Coverage {
            if let Some(path) = &self.local_coverage_prompt_path {
                match tokio::fs::read_to_string(path).await {
                    Ok(text) => return text,
                    Err(e) => warn!(?path, error = %e, "failed to read local coverage prompt override, falling back"),
                }
            }
        }

        match self.fetch_from_registry(name).await {
            Ok(text) => text,
            Err(e) => {
                warn!(prompt = name.registry_name(), error = %e, "prompt registry fetch failed, using default");
                name.default_text().to_string()
            }
        }
    }

    async fn fetch_from_registry(&self, name: PromptName) -> Result<String> {
        let url = format!(
            "https://api.smith.langchain.com/commits/{}/{}/latest",
            self.project,
            name.registry_name()
        );

        let response = self
            .http
            .get(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(crate::error::Error::Prompt(format!(
                "registry returned HTTP {} for '{}'",
                response.status(),
                name.registry_name()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        extract_template(&body)
            .ok_or_else(|| crate::error::Error::Prompt(format!("no template found in registry response for '{}'", name.registry_name())))
    }
}

/// Commit manifests from the registry nest the template text at varying
/// depths depending on prompt type (plain string prompt vs. chat prompt with
/// message templates); walk the common shapes rather than assuming one.
fn extract_template(body: &serde_json::Value) -> Option<String> {
    if let Some(template) = body.pointer("/manifest/kwargs/template").and_then(|v| v.as_str()) {
        return Some(template.to_string());
    }
    if let Some(template) = body
        .pointer("/manifest/kwargs/messages/0/kwargs/prompt/kwargs/template")
        .and_then(|v| v.as_str())
    {
        return Some(template.to_string());
    }
    body.get("template")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_template() {
        let body = serde_json::json!({"manifest": {"kwargs": {"template": "hello {x}"}}});
        assert_eq!(extract_template(&body), Some("hello {x}".to_string()));
    }

    #[test]
    fn extracts_chat_prompt_template() {
        let body = serde_json::json!({
            "manifest": {"kwargs": {"messages": [
                {"kwargs": {"prompt": {"kwargs": {"template": "system prompt"}}}}
            ]}}
        });
        assert_eq!(extract_template(&body), Some("system prompt".to_string()));
    }

    #[test]
    fn falls_back_to_default_text() {
        assert_eq!(PromptName::Plan.default_text(), defaults::PLAN_PROMPT);
    }
}
