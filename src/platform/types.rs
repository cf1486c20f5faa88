//! Wire types for the messaging-platform REST API (§6).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{Attachment, ConversationMessage, Role, UserDetails};

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationResponse {
    pub id: String,
    #[serde(default)]
    pub source: Option<ConversationSource>,
    #[serde(default)]
    pub conversation_parts: Option<ConversationParts>,
    #[serde(default)]
    pub contacts: Option<Contacts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSource {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<PartAuthor>,
    #[serde(default)]
    pub attachments: Vec<PartAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationParts {
    #[serde(default)]
    pub conversation_parts: Vec<ConversationPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationPart {
    #[serde(default)]
    pub part_type: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<PartAuthor>,
    #[serde(default)]
    pub attachments: Vec<PartAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartAuthor {
    #[serde(default)]
    pub author_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartAttachment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl From<PartAttachment> for Attachment {
    fn from(a: PartAttachment) -> Self {
        Attachment {
            name: a.name.unwrap_or_default(),
            content_type: a.content_type.unwrap_or_default(),
            url: a.url.unwrap_or_default(),
            filesize: a.filesize,
            width: a.width,
            height: a.height,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contacts {
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Strip HTML tags a plaintext-display conversation body may still carry.
fn strip_html(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_tag = false;
    for ch in body.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

impl ConversationResponse {
    /// Flatten the source message plus every part into the orchestrator's
    /// transcript shape, oldest first.
    pub fn to_messages(&self) -> Vec<ConversationMessage> {
        let mut messages = Vec::new();

        if let Some(source) = &self.source {
            if let Some(body) = &source.body {
                let role = role_for_author(source.author.as_ref());
                messages.push(ConversationMessage {
                    role,
                    content: strip_html(body),
                    attachments: source
                        .attachments
                        .iter()
                        .cloned()
                        .map(Attachment::from)
                        .collect(),
                });
            }
        }

        if let Some(parts) = &self.conversation_parts {
            for part in &parts.conversation_parts {
                let Some(body) = &part.body else { continue };
                if body.trim().is_empty() {
                    continue;
                }
                if part.part_type.as_deref() == Some("note") {
                    continue;
                }
                let role = role_for_author(part.author.as_ref());
                messages.push(ConversationMessage {
                    role,
                    content: strip_html(body),
                    attachments: part.attachments.iter().cloned().map(Attachment::from).collect(),
                });
            }
        }

        messages
    }

    pub fn subject(&self) -> Option<String> {
        self.source.as_ref().and_then(|s| s.subject.clone())
    }

    pub fn user_details(&self) -> UserDetails {
        let contact = self
            .contacts
            .as_ref()
            .and_then(|c| c.contacts.first())
            .cloned();
        UserDetails {
            name: contact.as_ref().and_then(|c| c.name.clone()),
            email: contact.as_ref().and_then(|c| c.email.clone()),
        }
    }
}

fn role_for_author(author: Option<&PartAuthor>) -> Role {
    match author.and_then(|a| a.author_type.as_deref()) {
        Some("admin") | Some("bot") => Role::Assistant,
        _ => Role::User,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyRequest {
    pub message_type: MessageType,
    #[serde(rename = "type")]
    pub author_type: &'static str,
    pub admin_id: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Comment,
    Note,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnoozeRequest {
    pub message_type: &'static str,
    pub admin_id: String,
    pub snoozed_until: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAttributesRequest {
    pub custom_attributes: Value,
}
