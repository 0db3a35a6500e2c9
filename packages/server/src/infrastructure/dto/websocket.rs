//! WebSocket event DTOs.
//!
//! Every text frame is one JSON object tagged by event name:
//!
//! ```text
//! {"event": "chat message", "data": "hi"}
//! {"event": "stop typing"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Any JSON value; only a string is taken as a name
    #[serde(rename = "set username")]
    SetUsername(Option<Value>),
    #[serde(rename = "typing")]
    Typing,
    #[serde(rename = "chat message")]
    ChatMessage(String),
    #[serde(rename = "private message")]
    PrivateMessage(PrivateMessagePayload),
    #[serde(rename = "reaction")]
    Reaction(Value),
}

/// Payload of a `private message` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessagePayload {
    /// Target connection id
    pub to: String,
    pub msg: String,
}

/// Events sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connected")]
    Connected(ConnectedPayload),
    #[serde(rename = "system message")]
    SystemMessage(String),
    #[serde(rename = "typing")]
    Typing(String),
    #[serde(rename = "stop typing")]
    StopTyping,
    #[serde(rename = "chat message")]
    ChatMessage(ChatPayload),
    #[serde(rename = "reaction")]
    Reaction(Value),
}

/// Payload of a `connected` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPayload {
    pub id: String,
}

/// Payload of a `chat message` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub user: String,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}
