//! HTTP JSON-RPC client for the tool server (§6): a single POST endpoint,
//! bearer-token authenticated, speaking `tools/list` and `tools/call`.
//!
//! Request/response framing and an atomic request-id counter wrap a plain
//! `reqwest` POST, since the tool server here is a remote HTTP webhook
//! rather than a local subprocess speaking MCP over stdio.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};

use super::protocol::{McpRequest, McpResponse, McpTool, McpToolResult};
use crate::config::ToolServerConfig;
use crate::error::{Error, Result};

pub struct ToolServerClient {
    http: reqwest::Client,
    endpoint: String,
    auth_token: secrecy::SecretString,
    next_id: AtomicU64,
}

impl ToolServerClient {
    pub fn new(config: &ToolServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout.unwrap_or(Duration::from_secs(30)))
            .build()
            .map_err(|e| Error::Config(format!("failed to build tool server HTTP client: {e}")))?;

        Ok(ToolServerClient {
            http,
            endpoint: config.endpoint(),
            auth_token: config.auth_token.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn send_request(&self, request: McpRequest) -> Result<McpResponse> {
        let json = serde_json::to_string(&request)?;
        debug!(endpoint = %self.endpoint, method = %request.method, "tool server request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.auth_token.expose_secret())
            .header("content-type", "application/json")
            .body(json)
            .send()
            .await
            .map_err(|e| Error::Connection(format!("tool server request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Connection(format!("failed to read tool server response: {e}")))?;

        if status.as_u16() == 429 {
            return Err(Error::RateLimit("tool server rate limited the request".to_string()));
        }
        if !status.is_success() {
            return Err(Error::ToolServer(format!(
                "tool server returned HTTP {status}: {body}"
            )));
        }

        let parsed: McpResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidInput(format!("malformed tool server response: {e} (raw: {body})")))?;

        if let Some(err) = &parsed.error {
            return Err(Error::ToolServer(format!(
                "tool server error {}: {}",
                err.code, err.message
            )));
        }

        Ok(parsed)
    }

    pub async fn list_tools(&self) -> Result<Vec<McpTool>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let response = self.send_request(McpRequest::list_tools(id)).await?;

        let result = response.result.unwrap_or_default();
        let tools: Vec<McpTool> = result
            .get("tools")
            .and_then(|t| serde_json::from_value(t.clone()).ok())
            .unwrap_or_default();

        debug!(count = tools.len(), "tool server catalog fetched");
        Ok(tools)
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let response = self
            .send_request(McpRequest::call_tool(id, name, arguments))
            .await?;

        let result = response.result.unwrap_or_default();
        let tool_result: McpToolResult = serde_json::from_value(result)
            .map_err(|e| Error::InvalidInput(format!("failed to parse tool result for {name}: {e}")))?;

        if tool_result.is_error {
            warn!(tool = name, "tool server reported tool-level error");
        }

        Ok(tool_result)
    }
}
