//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信を抽象化します。
//! トランスポート層の接続（表示名の有無に関係なく、生きている全ての接続）を管理するのもこの trait です。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// クライアントへ送るメッセージのチャンネル（エンコード済みのフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除
    ///
    /// 登録されていた場合 `true`。二回目以降は `false`（冪等）。
    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool;

    /// 接続が生きているか
    async fn is_connected(&self, connection_id: &ConnectionId) -> bool;

    /// 生きている全ての接続の ID
    async fn connected_client_ids(&self) -> Vec<ConnectionId>;

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信（一部の送信失敗は許容する）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;
}
