//! UseCase: typing インジケータ（Presence/Typing Tracker）
//!
//! 接続ごとに Idle / Typing の状態を持つ。
//!
//! ```text
//! Idle   --typing-->  Typing   typing を他の全員へ、期限タイマーを張る
//! Typing --typing-->  Typing   タイマーを張り直す（debounce）
//! Typing --expire-->  Idle     stop typing を他の全員へ
//! Typing --cancel-->  (削除)   何も送らない（切断通知が優先）
//! ```
//!
//! タイマーには世代番号を振る。張り直し・取り消しと期限切れの判定は同じロックの中で行い、
//! 世代が一致した期限切れだけが stop typing を送る。

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::{ConnectionId, ConnectionRegistry, NameFallback, OutboundEvent};

use super::router::EventRouter;

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerTable {
    next_generation: u64,
    pending: HashMap<ConnectionId, PendingTimer>,
}

/// typing インジケータの debounce と期限切れ
pub struct TypingTracker {
    registry: Arc<dyn ConnectionRegistry>,
    router: Arc<EventRouter>,
    window: Duration,
    timers: Arc<Mutex<TimerTable>>,
}

impl TypingTracker {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        router: Arc<EventRouter>,
        window: Duration,
    ) -> Self {
        Self {
            registry,
            router,
            window,
            timers: Arc::new(Mutex::new(TimerTable::default())),
        }
    }

    /// typing イベントを受け取った
    ///
    /// 他の全員に typing を送り、期限タイマーを張り直す。
    pub async fn on_typing(&self, connection_id: &ConnectionId) {
        let name = self
            .registry
            .get_identity(connection_id, NameFallback::Anonymous)
            .await;

        // typing の送信とタイマーの張り直しを期限切れ処理と直列にする
        let mut timers = self.timers.lock().await;
        self.router
            .broadcast_except(connection_id, &OutboundEvent::Typing(name))
            .await;

        timers.next_generation += 1;
        let generation = timers.next_generation;
        let handle = tokio::spawn(expire(
            self.timers.clone(),
            self.router.clone(),
            connection_id.clone(),
            generation,
            self.window,
        ));

        let previous = timers
            .pending
            .insert(connection_id.clone(), PendingTimer { generation, handle });
        if let Some(previous) = previous {
            previous.handle.abort();
            tracing::debug!(
                "Typing timer for '{}' re-armed (generation {} -> {})",
                connection_id,
                previous.generation,
                generation
            );
        }
    }

    /// 保留中のタイマーを取り消す（stop typing は送らない）
    ///
    /// 取り消した場合 `true`。
    pub async fn cancel(&self, connection_id: &ConnectionId) -> bool {
        let mut timers = self.timers.lock().await;
        match timers.pending.remove(connection_id) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// 現在 Typing 状態か
    pub async fn is_typing(&self, connection_id: &ConnectionId) -> bool {
        let timers = self.timers.lock().await;
        timers.pending.contains_key(connection_id)
    }
}

async fn expire(
    timers: Arc<Mutex<TimerTable>>,
    router: Arc<EventRouter>,
    connection_id: ConnectionId,
    generation: u64,
    window: Duration,
) {
    tokio::time::sleep(window).await;

    let mut timers = timers.lock().await;
    match timers.pending.get(&connection_id) {
        Some(timer) if timer.generation == generation => {
            timers.pending.remove(&connection_id);
        }
        // 張り直された、または取り消された
        _ => return,
    }

    tracing::debug!("Typing timer for '{}' expired", connection_id);
    router
        .broadcast_except(&connection_id, &OutboundEvent::StopTyping)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MessagePusher,
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        },
    };
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - typing の送信、debounce、期限切れの stop typing、取り消し
    //
    // 【なぜこのテストが必要か】
    // - 連続した typing に対して stop typing は最後の typing から数えて一度だけ
    // - 張り直しと期限切れが競合しても両方が有効になってはいけない
    //
    // 時間は start_paused で止めて進める。
    // ========================================

    const WINDOW: Duration = Duration::from_millis(2000);

    struct Fixture {
        tracker: TypingTracker,
        registry: Arc<InMemoryConnectionRegistry>,
        sender: mpsc::UnboundedReceiver<String>,
        observer: mpsc::UnboundedReceiver<String>,
    }

    async fn setup() -> Fixture {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (tx_a, sender) = mpsc::unbounded_channel();
        let (tx_b, observer) = mpsc::unbounded_channel();
        pusher.register_client(ConnectionId::new("a"), tx_a).await;
        pusher.register_client(ConnectionId::new("b"), tx_b).await;
        let router = Arc::new(EventRouter::new(pusher));
        let tracker = TypingTracker::new(registry.clone(), router, WINDOW);
        Fixture {
            tracker,
            registry,
            sender,
            observer,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    fn stop_typing_count(frames: &[Value]) -> usize {
        frames
            .iter()
            .filter(|f| **f == json!({"event": "stop typing"}))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_before_join_uses_anonymous() {
        // テスト項目: 表示名未設定の接続の typing は "Anonymous" として他の全員に届く
        // given (前提条件):
        let mut f = setup().await;
        let a = ConnectionId::new("a");

        // when (操作):
        f.tracker.on_typing(&a).await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut f.observer),
            vec![json!({"event": "typing", "data": "Anonymous"})]
        );
        assert!(drain(&mut f.sender).is_empty());
        assert!(f.tracker.is_typing(&a).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_typing_after_window() {
        // テスト項目: 期限が切れると stop typing が他の全員に一度だけ届く
        // given (前提条件):
        let mut f = setup().await;
        let a = ConnectionId::new("a");
        f.registry
            .set_identity(a.clone(), Some("Alice".to_string()))
            .await;

        // when (操作):
        f.tracker.on_typing(&a).await;
        tokio::time::sleep(Duration::from_millis(2100)).await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut f.observer),
            vec![
                json!({"event": "typing", "data": "Alice"}),
                json!({"event": "stop typing"}),
            ]
        );
        assert!(drain(&mut f.sender).is_empty());
        assert!(!f.tracker.is_typing(&a).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_times_from_last_typing() {
        // テスト項目: 期限内の typing はタイマーを張り直し、stop typing は最後の typing から数える
        // given (前提条件):
        let mut f = setup().await;
        let a = ConnectionId::new("a");
        f.tracker.on_typing(&a).await;

        // when (操作):
        tokio::time::sleep(Duration::from_millis(1500)).await;
        f.tracker.on_typing(&a).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // then (期待する結果): 最初の typing から 3000ms 経過しているが、まだ届かない
        assert_eq!(stop_typing_count(&drain(&mut f.observer)), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(stop_typing_count(&drain(&mut f.observer)), 1);

        // さらに待っても二回目は来ない
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(stop_typing_count(&drain(&mut f.observer)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_stop_typing() {
        // テスト項目: 取り消したタイマーは stop typing を送らない
        // given (前提条件):
        let mut f = setup().await;
        let a = ConnectionId::new("a");
        f.tracker.on_typing(&a).await;
        drain(&mut f.observer);

        // when (操作):
        let cancelled = f.tracker.cancel(&a).await;
        tokio::time::sleep(Duration::from_millis(3000)).await;

        // then (期待する結果):
        assert!(cancelled);
        assert!(drain(&mut f.observer).is_empty());
        assert!(!f.tracker.cancel(&a).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_again_after_idle_starts_new_cycle() {
        // テスト項目: Idle に戻った後の typing は新しいサイクルとして扱われる
        // given (前提条件):
        let mut f = setup().await;
        let a = ConnectionId::new("a");
        f.tracker.on_typing(&a).await;
        tokio::time::sleep(Duration::from_millis(2100)).await;
        drain(&mut f.observer);

        // when (操作):
        f.tracker.on_typing(&a).await;
        tokio::time::sleep(Duration::from_millis(2100)).await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut f.observer),
            vec![
                json!({"event": "typing", "data": "Anonymous"}),
                json!({"event": "stop typing"}),
            ]
        );
    }
}
