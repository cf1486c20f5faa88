//! Tool server integration (§4.3, §6): JSON-RPC 2.0 over HTTP POST with
//! bearer-token auth, replacing the MCP stdio transport this module was
//! grounded on with a plain REST call against a fixed webhook path.

mod catalog;
mod client;
mod protocol;

pub use catalog::{build_catalog, tool_type_for};
pub use client::ToolServerClient;
pub use protocol::{McpContent, McpRequest, McpResponse, McpTool, McpToolInput, McpToolResult};
