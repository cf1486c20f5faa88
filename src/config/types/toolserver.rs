//! Tool-server (JSON-RPC over HTTP) client configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Settings for the tool server the orchestrator calls during Gather/Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerConfig {
    /// Base URL of the tool server, e.g. `https://tools.example.com`.
    #[serde(default)]
    pub base_url: String,

    /// Bearer token used on every JSON-RPC request.
    #[serde(default = "default_secret")]
    pub auth_token: SecretString,

    /// Path appended to `base_url` for the JSON-RPC endpoint.
    #[serde(default = "default_path")]
    pub path: String,

    /// Per-call timeout.
    #[serde(default = "default_timeout", with = "humantime_serde::option")]
    pub timeout: Option<std::time::Duration>,
}

impl Default for ToolServerConfig {
    fn default() -> Self {
        ToolServerConfig {
            base_url: String::new(),
            auth_token: default_secret(),
            path: default_path(),
            timeout: default_timeout(),
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_path() -> String {
    "/webhook/talent-success/mcp".to_string()
}

fn default_timeout() -> Option<std::time::Duration> {
    Some(std::time::Duration::from_secs(30))
}

impl ToolServerConfig {
    /// Full JSON-RPC endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.path
        )
    }
}
