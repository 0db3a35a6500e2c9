//! ドメイン層
//!
//! 接続・表示名・送信イベントといったドメインモデルと、
//! ドメイン層が必要とする外部インターフェース（trait）を定義します。

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod routing;
pub mod value_object;
pub mod welcome;

pub use entity::{InboundEvent, OutboundEvent, Participant, SessionPhase};
pub use error::{MessagePushError, WelcomeError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::ConnectionRegistry;
pub use routing::{Recipients, resolve_recipients};
pub use value_object::{ConnectionId, ConnectionIdFactory, DisplayName, NameFallback, Timestamp};
pub use welcome::WelcomeMessageProvider;
#[cfg(test)]
pub use welcome::MockWelcomeMessageProvider;
