//! Policy/validation-service client configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Settings for the validation service consulted during Validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationServiceConfig {
    /// Full endpoint URL the reply is POSTed to.
    #[serde(default)]
    pub endpoint: String,

    /// `x-api-key` header value.
    #[serde(default = "default_secret")]
    pub api_key: SecretString,

    /// Request timeout. Defaults to 120s since the service may run
    /// expensive policy checks.
    #[serde(default = "default_timeout", with = "humantime_serde::option")]
    pub timeout: Option<std::time::Duration>,
}

impl Default for ValidationServiceConfig {
    fn default() -> Self {
        ValidationServiceConfig {
            endpoint: String::new(),
            api_key: default_secret(),
            timeout: default_timeout(),
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_timeout() -> Option<std::time::Duration> {
    Some(std::time::Duration::from_secs(120))
}
