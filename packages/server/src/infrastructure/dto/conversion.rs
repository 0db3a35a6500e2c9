//! Conversion logic between DTOs and domain models.

use hiroba_shared::time::millis_to_rfc3339;

use crate::domain::{ConnectionId, InboundEvent, OutboundEvent, Participant};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientEvent> for InboundEvent {
    fn from(dto: dto::ClientEvent) -> Self {
        match dto {
            dto::ClientEvent::SetUsername(name) => InboundEvent::SetUsername(username_text(name)),
            dto::ClientEvent::Typing => InboundEvent::Typing,
            dto::ClientEvent::ChatMessage(msg) => InboundEvent::ChatMessage(msg),
            dto::ClientEvent::PrivateMessage(payload) => InboundEvent::PrivateMessage {
                to: ConnectionId::new(payload.to),
                msg: payload.msg,
            },
            dto::ClientEvent::Reaction(value) => InboundEvent::Reaction(value),
        }
    }
}

/// 文字列以外の名前は未指定として扱う（"Guest" になる）
fn username_text(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(name)) => Some(name),
        _ => None,
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&OutboundEvent> for dto::ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Connected { id } => dto::ServerEvent::Connected(dto::ConnectedPayload {
                id: id.as_str().to_string(),
            }),
            OutboundEvent::SystemMessage(text) => dto::ServerEvent::SystemMessage(text.clone()),
            OutboundEvent::Typing(name) => dto::ServerEvent::Typing(name.as_str().to_string()),
            OutboundEvent::StopTyping => dto::ServerEvent::StopTyping,
            OutboundEvent::ChatMessage { user, msg, private } => {
                dto::ServerEvent::ChatMessage(dto::ChatPayload {
                    user: user.as_str().to_string(),
                    msg: msg.clone(),
                    private: private.then_some(true),
                })
            }
            OutboundEvent::Reaction(value) => dto::ServerEvent::Reaction(value.clone()),
        }
    }
}

impl From<Participant> for http::ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name.into_string(),
            joined_at: millis_to_rfc3339(model.joined_at.value()).unwrap_or_default(),
        }
    }
}
