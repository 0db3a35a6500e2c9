//! UseCase: イベント配送（Event Router）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - broadcast_all / broadcast_except / unicast の配送先
//!
//! ### なぜこのテストが必要か
//! - 送信者に自分のメッセージが返る／返らないは、チャット・入退室・typing で異なる
//! - 存在しない宛先への個別メッセージはエラーにせず破棄する
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 接続への配送
//! - エッジケース：表示名未設定の接続も配送対象になる
//! - 異常系：存在しない宛先

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, Recipients, resolve_recipients};

/// 個別配送の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// 宛先が生きていないので破棄した（送信者には通知しない）
    Dropped,
}

/// イベントの宛先を決めて MessagePusher に渡す
pub struct EventRouter {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl EventRouter {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 送信者を含む全ての接続に配送（表示名の有無は問わない）
    ///
    /// 配送先の接続 ID を返す。
    pub async fn broadcast_all(&self, event: &OutboundEvent) -> Vec<ConnectionId> {
        self.route(&Recipients::All, event).await
    }

    /// 送信者以外の全ての接続に配送
    pub async fn broadcast_except(
        &self,
        sender: &ConnectionId,
        event: &OutboundEvent,
    ) -> Vec<ConnectionId> {
        self.route(&Recipients::AllExcept(sender.clone()), event)
            .await
    }

    /// 宛先の接続だけに配送
    ///
    /// 宛先が生きていなければ何も送らずに `Delivery::Dropped` を返す。
    pub async fn unicast(&self, target: &ConnectionId, event: &OutboundEvent) -> Delivery {
        if self.route(&Recipients::Only(target.clone()), event).await.is_empty() {
            tracing::debug!("No live connection '{}', dropping '{}'", target, event.name());
            Delivery::Dropped
        } else {
            Delivery::Delivered
        }
    }

    async fn route(&self, recipients: &Recipients, event: &OutboundEvent) -> Vec<ConnectionId> {
        let live = self.message_pusher.connected_client_ids().await;
        let targets = resolve_recipients(recipients, &live);
        if targets.is_empty() {
            return targets;
        }

        if let Err(e) = self.message_pusher.broadcast(targets.clone(), event).await {
            tracing::warn!("Failed to route '{}': {}", event.name(), e);
        }
        targets
    }
}
