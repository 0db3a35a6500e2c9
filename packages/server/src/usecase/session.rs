//! UseCase: セッションのライフサイクル（Session Lifecycle Controller）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - connect / set username / chat message / private message / reaction / typing / disconnect
//!
//! ### なぜこのテストが必要か
//! - 入室通知・ウェルカムメッセージ・退室通知の宛先が正しいこと
//! - ウェルカムメッセージの失敗がセッションに影響しないこと
//! - 切断は一度だけ有効で、切断後のイベントは何もしないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：A, B, C の 3 接続でのやりとり
//! - 異常系：ウェルカムメッセージの取得失敗・タイムアウト、存在しない宛先
//! - エッジケース：ウェルカムメッセージ取得中の切断、二重切断

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, OwnedMutexGuard},
    task::JoinHandle,
};

use crate::{
    config::ChatConfig,
    domain::{
        ConnectionId, ConnectionRegistry, InboundEvent, MessagePusher, NameFallback,
        OutboundEvent, PusherChannel, SessionPhase, WelcomeError, WelcomeMessageProvider,
    },
};

use super::{
    presence::TypingTracker,
    router::{Delivery, EventRouter},
};

/// 接続ごとのセッション状態遷移を組み立てる
pub struct SessionController {
    /// Registry（接続 ID → 表示名）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（生きているトランスポート接続）
    message_pusher: Arc<dyn MessagePusher>,
    router: Arc<EventRouter>,
    typing: TypingTracker,
    welcome: Arc<dyn WelcomeMessageProvider>,
    welcome_timeout: Duration,
    /// 接続ごとのガード。イベント処理と切断を接続単位で直列にする
    guards: Mutex<HashMap<ConnectionId, Arc<Mutex<()>>>>,
}

impl SessionController {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        welcome: Arc<dyn WelcomeMessageProvider>,
        config: &ChatConfig,
    ) -> Self {
        let router = Arc::new(EventRouter::new(message_pusher.clone()));
        let typing = TypingTracker::new(registry.clone(), router.clone(), config.typing_window);
        Self {
            registry,
            message_pusher,
            router,
            typing,
            welcome,
            welcome_timeout: config.welcome_timeout,
            guards: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_session(&self, connection_id: &ConnectionId) -> Option<OwnedMutexGuard<()>> {
        let guard = self.guards.lock().await.get(connection_id).cloned()?;
        Some(guard.lock_owned().await)
    }

    /// トランスポート接続を受け付けた（Connected）
    ///
    /// 本人に自分の接続 ID を知らせる。
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.guards
            .lock()
            .await
            .insert(connection_id.clone(), Arc::new(Mutex::new(())));
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        tracing::info!("Connection '{}' accepted", connection_id);

        let event = OutboundEvent::Connected {
            id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &event).await {
            tracing::warn!("Failed to send connection id to '{}': {}", connection_id, e);
        }
    }

    /// 現在のセッション状態
    pub async fn phase(&self, connection_id: &ConnectionId) -> SessionPhase {
        if !self.message_pusher.is_connected(connection_id).await {
            SessionPhase::Disconnected
        } else if self.registry.lookup(connection_id).await.is_some() {
            SessionPhase::Identified
        } else {
            SessionPhase::Connected
        }
    }

    /// クライアントからのイベントを処理
    ///
    /// 切断済みの接続のイベントは何もしない。処理中の切断はこのイベントの完了を待つ。
    pub async fn handle(&self, connection_id: &ConnectionId, event: InboundEvent) {
        let Some(_session) = self.lock_session(connection_id).await else {
            tracing::debug!("Ignoring event from unknown '{}'", connection_id);
            return;
        };
        if self.phase(connection_id).await == SessionPhase::Disconnected {
            tracing::debug!("Ignoring event from disconnected '{}'", connection_id);
            return;
        }

        match event {
            InboundEvent::SetUsername(name) => {
                // ウェルカムメッセージは待たない
                drop(self.set_username(connection_id, name).await);
            }
            InboundEvent::Typing => self.typing(connection_id).await,
            InboundEvent::ChatMessage(msg) => self.chat_message(connection_id, msg).await,
            InboundEvent::PrivateMessage { to, msg } => {
                self.private_message(connection_id, &to, msg).await;
            }
            InboundEvent::Reaction(payload) => self.reaction(payload).await,
        }
    }

    /// 表示名を設定（Connected / Identified → Identified）
    ///
    /// 他の全員に入室を通知し、ウェルカムメッセージの取得を別タスクで開始する。
    /// 返り値はそのタスクのハンドル。
    pub async fn set_username(
        &self,
        connection_id: &ConnectionId,
        name: Option<String>,
    ) -> JoinHandle<()> {
        let name = self
            .registry
            .set_identity(connection_id.clone(), name)
            .await;
        tracing::info!("Connection '{}' set username: {}", connection_id, name);

        self.router
            .broadcast_except(connection_id, &OutboundEvent::joined(&name))
            .await;

        tokio::spawn(deliver_welcome(
            self.welcome.clone(),
            self.message_pusher.clone(),
            connection_id.clone(),
            self.welcome_timeout,
        ))
    }

    /// typing インジケータ
    pub async fn typing(&self, connection_id: &ConnectionId) {
        self.typing.on_typing(connection_id).await;
    }

    /// チャットメッセージを送信者を含む全員へ
    pub async fn chat_message(&self, connection_id: &ConnectionId, msg: String) {
        let user = self
            .registry
            .get_identity(connection_id, NameFallback::Guest)
            .await;
        let event = OutboundEvent::ChatMessage {
            user,
            msg,
            private: false,
        };
        self.router.broadcast_all(&event).await;
    }

    /// 個別メッセージを宛先だけへ
    ///
    /// 宛先が存在しなければ破棄し、送信者には何も返さない。
    pub async fn private_message(
        &self,
        connection_id: &ConnectionId,
        to: &ConnectionId,
        msg: String,
    ) -> Delivery {
        let user = self
            .registry
            .get_identity(connection_id, NameFallback::Anonymous)
            .await;
        let event = OutboundEvent::ChatMessage {
            user,
            msg,
            private: true,
        };

        let delivery = self.router.unicast(to, &event).await;
        if delivery == Delivery::Dropped {
            tracing::debug!(
                "Private message from '{}' to unknown '{}' dropped",
                connection_id,
                to
            );
        }
        delivery
    }

    /// リアクションをそのまま全員へ
    pub async fn reaction(&self, payload: serde_json::Value) {
        self.router
            .broadcast_all(&OutboundEvent::Reaction(payload))
            .await;
    }

    /// 切断（任意の状態 → Disconnected）
    ///
    /// 表示名を設定していれば他の全員に退室を通知する。二回目以降は何もせず `false` を返す。
    pub async fn disconnect(&self, connection_id: &ConnectionId) -> bool {
        let _session = self.lock_session(connection_id).await;
        self.guards.lock().await.remove(connection_id);

        if !self.message_pusher.unregister_client(connection_id).await {
            tracing::debug!("Connection '{}' already disconnected", connection_id);
            return false;
        }

        self.typing.cancel(connection_id).await;

        match self.registry.remove(connection_id).await {
            Some(name) => {
                tracing::info!("User {} disconnected ('{}')", name, connection_id);
                self.router
                    .broadcast_except(connection_id, &OutboundEvent::left(&name))
                    .await;
            }
            None => tracing::info!("Connection '{}' closed before joining", connection_id),
        }

        true
    }
}

async fn deliver_welcome(
    welcome: Arc<dyn WelcomeMessageProvider>,
    message_pusher: Arc<dyn MessagePusher>,
    connection_id: ConnectionId,
    timeout: Duration,
) {
    let text = tokio::time::timeout(timeout, welcome.fetch_welcome())
        .await
        .unwrap_or(Err(WelcomeError::TimedOut(timeout)));

    let text = match text {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Error fetching welcome message for '{}': {}", connection_id, e);
            return;
        }
    };

    // 取得中に切断されていたら送らない
    if !message_pusher.is_connected(&connection_id).await {
        tracing::debug!("'{}' left before welcome message arrived", connection_id);
        return;
    }

    if let Err(e) = message_pusher
        .push_to(&connection_id, &OutboundEvent::SystemMessage(text))
        .await
    {
        tracing::debug!("Failed to deliver welcome message to '{}': {}", connection_id, e);
    }
}
