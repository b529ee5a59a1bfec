//! Chat transcripts: the wire shape of a message, the external session
//! key, and the per-entry counters the ingestion endpoint (C7) maintains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
}

/// Content can be a plain string or a list of typed items (§6's on-disk
/// session-log contract); callers normalize to plain text before storing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub text: Option<String>,
}

impl MessageContent {
    /// Flatten to plain text: the string itself, or the concatenation of
    /// `text`-typed items, in order.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Items(items) => items
                .iter()
                .filter(|i| i.item_type == "text")
                .filter_map(|i| i.text.as_deref())
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

/// One record in a session's JSONL transcript (§6). `display_name`,
/// `handle`, and `reply_to` carry the channel's own attribution when the
/// transcript comes from a chat adapter; the syncer's channel-metadata
/// extractor (§4.6) projects them onto the outgoing `ChatMessage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub kind: String,
    pub role: Option<MessageRole>,
    pub content: Option<MessageContent>,
    pub timestamp: Option<DateTime<Utc>>,
    pub id: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<serde_json::Value>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
}

/// A message as appended to the Store (`POST /chat-stream/append` body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub message_id: Option<String>,
    pub source: Option<String>,
}

/// `{channel}:{agent}:{principal}` (§3, glossary).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExternalSessionKey {
    pub channel: String,
    pub agent: String,
    pub principal: String,
}

impl ExternalSessionKey {
    pub fn new(channel: impl Into<String>, agent: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            agent: agent.into(),
            principal: principal.into(),
        }
    }

    pub fn as_string(&self) -> String {
        format!("{}:{}:{}", self.channel, self.agent, self.principal)
    }

    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let channel = parts.next()?.to_string();
        let agent = parts.next()?.to_string();
        let principal = parts.next()?.to_string();
        Some(Self { channel, agent, principal })
    }
}

/// A reaction posted against a previously-appended message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReaction {
    pub target_message_id: String,
    pub emoji: String,
    pub from_user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendRequest {
    pub session_id: String,
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendResponse {
    pub ok: bool,
    pub stream_id: String,
    pub message_count: u64,
}
