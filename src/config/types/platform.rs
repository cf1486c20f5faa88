//! Messaging-platform client configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Settings for the hosted messaging-platform REST client (see external
/// interfaces §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Bearer token used to authenticate against the messaging platform.
    #[serde(default = "default_secret")]
    pub api_key: SecretString,

    /// Identity used when posting replies/notes as the agent.
    #[serde(default)]
    pub admin_id: String,

    /// Base URL of the messaging-platform API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version header value sent on every request.
    #[serde(default = "default_version")]
    pub api_version: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs", with = "humantime_serde::option")]
    pub timeout: Option<std::time::Duration>,

    /// Maximum number of 429 retries before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig {
            api_key: default_secret(),
            admin_id: String::new(),
            base_url: default_base_url(),
            api_version: default_version(),
            timeout: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_base_url() -> String {
    "https://api.intercom.io".to_string()
}

fn default_version() -> String {
    "2.14".to_string()
}

fn default_timeout_secs() -> Option<std::time::Duration> {
    Some(std::time::Duration::from_secs(30))
}

fn default_max_retries() -> u32 {
    3
}
