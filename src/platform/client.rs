//! Messaging-platform REST client (§6): conversation/contact fetch, reply
//! and internal-note posting, custom-attribute updates, and snoozing.
//!
//! Default-header construction, bearer auth, and typed error mapping on
//! non-2xx follow the same shape as this codebase's other HTTP clients.
//! Retries use a hand-rolled exponential backoff matching §5's exact formula
//! rather than the `backoff` crate.

use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::types::{ConversationResponse, MessageType, ReplyRequest, SnoozeRequest, UpdateAttributesRequest};
use crate::config::PlatformConfig;
use crate::error::{Error, Result};

/// Base delay for the retry formula `base * 2^attempt + U(0,1)` (§5).
const RETRY_BASE: Duration = Duration::from_secs(1);
const MAX_RETRIES: u32 = 3;

pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    admin_id: String,
    api_version: String,
}

impl PlatformClient {
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| Error::Config(format!("invalid platform API key: {e}")))?,
        );
        headers.insert(
            "Intercom-Version",
            reqwest::header::HeaderValue::from_str(&config.api_version)
                .map_err(|e| Error::Config(format!("invalid platform API version: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout.unwrap_or(Duration::from_secs(30)))
            .build()
            .map_err(|e| Error::Config(format!("failed to build platform HTTP client: {e}")))?;

        Ok(PlatformClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            admin_id: config.admin_id.clone(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    pub async fn fetch_conversation(&self, conversation_id: &str) -> Result<ConversationResponse> {
        let url = format!(
            "{}/conversations/{}?display_as=plaintext",
            self.base_url, conversation_id
        );
        self.with_retry(|| self.http.get(&url).send()).await
    }

    pub async fn post_reply(&self, conversation_id: &str, body: impl Into<String>) -> Result<()> {
        let request = ReplyRequest {
            message_type: MessageType::Comment,
            author_type: "admin",
            admin_id: self.admin_id.clone(),
            body: body.into(),
        };
        self.post_part(conversation_id, &request).await
    }

    pub async fn post_note(&self, conversation_id: &str, body: impl Into<String>) -> Result<()> {
        let request = ReplyRequest {
            message_type: MessageType::Note,
            author_type: "admin",
            admin_id: self.admin_id.clone(),
            body: body.into(),
        };
        self.post_part(conversation_id, &request).await
    }

    async fn post_part<T: Serialize>(&self, conversation_id: &str, body: &T) -> Result<()> {
        let url = format!("{}/conversations/{}/reply", self.base_url, conversation_id);
        let _: serde_json::Value = self
            .with_retry(|| self.http.post(&url).json(body).send())
            .await?;
        Ok(())
    }

    pub async fn snooze(&self, conversation_id: &str, seconds: i64) -> Result<()> {
        let url = format!("{}/conversations/{}/parts", self.base_url, conversation_id);
        let request = SnoozeRequest {
            message_type: "snoozed",
            admin_id: self.admin_id.clone(),
            snoozed_until: Utc::now().timestamp() + seconds,
        };
        let _: serde_json::Value = self
            .with_retry(|| self.http.post(&url).json(&request).send())
            .await?;
        Ok(())
    }

    /// Set a custom attribute. Attribute names must match
    /// `^[A-Za-z0-9_\[\] -]+$`; rejected locally before the request is sent.
    pub async fn update_custom_attribute(
        &self,
        conversation_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        if !is_valid_attribute_name(name) {
            return Err(Error::InvalidInput(format!(
                "custom attribute name '{name}' contains characters outside [A-Za-z0-9_\\[\\] -]"
            )));
        }

        let url = format!("{}/conversations/{}", self.base_url, conversation_id);
        let mut attributes = serde_json::Map::new();
        attributes.insert(name.to_string(), value);
        let request = UpdateAttributesRequest {
            custom_attributes: serde_json::Value::Object(attributes),
        };
        let _: serde_json::Value = self
            .with_retry(|| self.http.put(&url).json(&request).send())
            .await?;
        Ok(())
    }

    /// Retries only on HTTP 429; any other status or a transport-level
    /// error is returned to the caller immediately.
    async fn with_retry<F, Fut, T>(&self, make_request: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            let outcome = make_request().await;
            match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 429 && attempt < MAX_RETRIES {
                        self.wait_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    if status.is_success() {
                        return response
                            .json::<T>()
                            .await
                            .map_err(|e| Error::Platform(format!("malformed platform response: {e}")));
                    }
                    let text = response.text().await.unwrap_or_default();
                    return Err(match status.as_u16() {
                        401 | 403 => Error::Unauthorized(format!("platform rejected credentials: {text}")),
                        404 => Error::NotFound(format!("platform resource not found: {text}")),
                        429 => Error::RateLimit(text),
                        _ => Error::Platform(format!("platform returned HTTP {status}: {text}")),
                    });
                }
                Err(e) => return Err(Error::Connection(format!("platform request failed: {e}"))),
            }
        }
    }

    async fn wait_before_retry(&self, attempt: u32) {
        let backoff = RETRY_BASE * 2u32.pow(attempt) + Duration::from_secs_f64(rand::random::<f64>());
        debug!(?backoff, attempt, "backing off before platform retry");
        tokio::time::sleep(backoff).await;
    }
}

/// `^[A-Za-z0-9_\[\] -]+$`
fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | ' ' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_attribute_names() {
        assert!(is_valid_attribute_name("Melvin Status"));
        assert!(is_valid_attribute_name("melvin_status[0]"));
        assert!(!is_valid_attribute_name("melvin.status"));
        assert!(!is_valid_attribute_name(""));
    }

    #[test]
    fn api_version_is_retained_on_construction() {
        let config = PlatformConfig {
            api_key: secrecy::SecretString::from("k".to_string()),
            admin_id: "1".to_string(),
            base_url: "https://api.intercom.io".to_string(),
            api_version: "2.14".to_string(),
            timeout: None,
            max_retries: 3,
        };
        let client = PlatformClient::new(&config).unwrap();
        assert_eq!(client.api_version, "2.14");
    }

    fn test_config(base_url: String) -> PlatformConfig {
        PlatformConfig {
            api_key: secrecy::SecretString::from("k".to_string()),
            admin_id: "1".to_string(),
            base_url,
            api_version: "2.14".to_string(),
            timeout: Some(Duration::from_secs(5)),
            max_retries: 3,
        }
    }

    #[tokio::test]
    async fn retries_429_then_succeeds() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations/conv-1"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/conversations/conv-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "conv-1",
                "source": {"subject": null, "body": "hi", "author": {"author_type": "user"}},
                "conversation_parts": {"conversation_parts": []},
                "contacts": {"contacts": []}
            })))
            .mount(&server)
            .await;

        let client = PlatformClient::new(&test_config(server.uri())).unwrap();
        let result = client.fetch_conversation("conv-1").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_429_status_is_not_retried() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations/conv-1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = PlatformClient::new(&test_config(server.uri())).unwrap();
        let result = client.fetch_conversation("conv-1").await;
        assert!(result.is_err());
    }
}
