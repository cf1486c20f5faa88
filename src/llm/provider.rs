//! Abstract interface for the LLM backend, kept as the seat for the two
//! named profiles (planner, drafter) the orchestrator uses - not a general
//! multi-provider abstraction.

use async_trait::async_trait;

use super::types::{GenerationOptions, LlmResponse, Message};
use crate::error::Result;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn default_model(&self) -> &str;

    async fn generate(&self, messages: &[Message], options: &GenerationOptions) -> Result<LlmResponse>;
}
