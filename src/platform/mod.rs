//! Messaging-platform client (§4.1, §4.6, §4.8-§4.10, §6).

mod client;
mod types;

pub use client::PlatformClient;
pub use types::{ConversationResponse, MessageType};
