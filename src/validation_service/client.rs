//! POSTs a draft reply to the policy service and returns its pass/fail
//! verdict. The raw JSON body is always preserved (Validate attaches it
//! verbatim to an internal note) even when the shape beyond `overall_passed`
//! varies between deployments.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::ValidationServiceConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
struct ValidationRequest {
    reply: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationVerdict {
    pub overall_passed: bool,
    #[serde(flatten)]
    pub raw: Value,
}

pub struct ValidationServiceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: secrecy::SecretString,
}

impl ValidationServiceClient {
    pub fn new(config: &ValidationServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout.unwrap_or(Duration::from_secs(120)))
            .build()
            .map_err(|e| Error::Config(format!("failed to build validation HTTP client: {e}")))?;

        Ok(ValidationServiceClient {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn validate(&self, reply: &str) -> Result<ValidationVerdict> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose_secret())
            .json(&ValidationRequest { reply: reply.to_string() })
            .send()
            .await
            .map_err(|e| Error::Connection(format!("validation service request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Connection(format!("failed to read validation response: {e}")))?;

        if !status.is_success() {
            return Err(Error::Validation(format!(
                "validation service returned HTTP {status}: {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Validation(format!("malformed validation response: {e} (raw: {body})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_construction_succeeds() {
        let config = ValidationServiceConfig {
            endpoint: "https://validate.example.com".to_string(),
            api_key: secrecy::SecretString::from("key".to_string()),
            timeout: Some(Duration::from_secs(5)),
        };
        assert!(ValidationServiceClient::new(&config).is_ok());
    }

    #[test]
    fn verdict_preserves_raw_body() {
        let raw = serde_json::json!({"overall_passed": true, "processing_time_ms": 42});
        let verdict: ValidationVerdict = serde_json::from_value(raw.clone()).unwrap();
        assert!(verdict.overall_passed);
        assert_eq!(verdict.raw["processing_time_ms"], 42);
    }
}
