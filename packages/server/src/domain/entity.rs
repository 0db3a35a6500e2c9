//! エンティティとイベント

use serde_json::Value;

use super::value_object::{ConnectionId, DisplayName, Timestamp};

/// 表示名を登録済みの参加者（Connection Registry の 1 エントリ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: DisplayName,
    /// 最初に表示名を設定した時刻（上書きしても変わらない）
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            joined_at,
        }
    }
}

/// 接続ごとのセッション状態
///
/// ```text
/// Connected --set username--> Identified --disconnect--> Disconnected
///     |                                                       ^
///     +--------------------------disconnect-------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// トランスポート接続済み、表示名未設定
    Connected,
    /// 表示名設定済み
    Identified,
    /// 切断済み（終端。以降のイベントは処理しない）
    Disconnected,
}

/// クライアントから届くイベント
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    SetUsername(Option<String>),
    Typing,
    ChatMessage(String),
    PrivateMessage { to: ConnectionId, msg: String },
    /// 中身は検証しない
    Reaction(Value),
}

/// クライアントへ送るイベント
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// 接続直後に本人にだけ送る、自分の接続 ID
    Connected { id: ConnectionId },
    SystemMessage(String),
    Typing(DisplayName),
    StopTyping,
    ChatMessage {
        user: DisplayName,
        msg: String,
        private: bool,
    },
    Reaction(Value),
}

impl OutboundEvent {
    pub fn joined(name: &DisplayName) -> Self {
        Self::SystemMessage(format!("{name} has joined the chat!"))
    }

    pub fn left(name: &DisplayName) -> Self {
        Self::SystemMessage(format!("{name} has left the chat."))
    }

    /// ログ用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::SystemMessage(_) => "system message",
            Self::Typing(_) => "typing",
            Self::StopTyping => "stop typing",
            Self::ChatMessage { .. } => "chat message",
            Self::Reaction(_) => "reaction",
        }
    }
}
