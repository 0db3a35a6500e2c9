//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセス再起動で全て消えます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hiroba_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, DisplayName, Participant, Timestamp};

/// インメモリ Connection Registry 実装
///
/// 単一の Mutex で全エントリを保護する（この規模ではグローバルロックで十分）。
pub struct InMemoryConnectionRegistry {
    participants: Mutex<HashMap<ConnectionId, Participant>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryConnectionRegistry {
    /// システム時刻を使う Registry を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 任意の Clock を使う Registry を作成
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            participants: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn set_identity(
        &self,
        connection_id: ConnectionId,
        name: Option<String>,
    ) -> DisplayName {
        let name = DisplayName::from_input(name);
        let mut participants = self.participants.lock().await;

        match participants.get_mut(&connection_id) {
            Some(participant) => {
                tracing::debug!(
                    "Connection '{}' renamed '{}' -> '{}'",
                    connection_id,
                    participant.name,
                    name
                );
                participant.name = name.clone();
            }
            None => {
                let joined_at = Timestamp::new(self.clock.now_millis());
                participants.insert(
                    connection_id.clone(),
                    Participant::new(connection_id, name.clone(), joined_at),
                );
            }
        }

        name
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let participants = self.participants.lock().await;
        participants.get(connection_id).map(|p| p.name.clone())
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let mut participants = self.participants.lock().await;
        participants.remove(connection_id).map(|p| p.name)
    }

    async fn participants(&self) -> Vec<Participant> {
        let participants = self.participants.lock().await;
        participants.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NameFallback;
    use hiroba_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryConnectionRegistry の set_identity / get_identity / remove
    //
    // 【なぜこのテストが必要か】
    // - Registry は「誰がどの名前でオンラインか」の唯一の情報源
    // - 名前の既定値への置き換えと、削除の冪等性を保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. 表示名の登録と取得
    // 2. 上書き（後勝ち）
    // 3. 空の名前は "Guest"
    // 4. 未登録時のフォールバック
    // 5. 削除と二重削除
    // ========================================

    fn create_test_registry() -> InMemoryConnectionRegistry {
        InMemoryConnectionRegistry::with_clock(Arc::new(FixedClock::new(1_000)))
    }

    #[tokio::test]
    async fn test_set_and_get_identity() {
        // テスト項目: 登録した表示名が取得できる
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::new("conn-a");

        // when (操作):
        let name = registry
            .set_identity(alice.clone(), Some("Alice".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
        assert_eq!(
            registry
                .get_identity(&alice, NameFallback::Guest)
                .await
                .as_str(),
            "Alice"
        );
    }

    #[tokio::test]
    async fn test_last_non_empty_name_wins() {
        // テスト項目: 複数回設定すると最後の名前が有効になる
        // given (前提条件):
        let registry = create_test_registry();
        let alice = ConnectionId::new("conn-a");

        // when (操作):
        registry
            .set_identity(alice.clone(), Some("Alice".to_string()))
            .await;
        registry
            .set_identity(alice.clone(), Some("Alicia".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(registry.lookup(&alice).await.unwrap().as_str(), "Alicia");
        assert_eq!(registry.participants().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_is_coerced_to_guest() {
        // テスト項目: 空の名前・未指定の名前は "Guest" として登録される
        // given (前提条件):
        let registry = create_test_registry();
        let a = ConnectionId::new("conn-a");
        let b = ConnectionId::new("conn-b");

        // when (操作):
        registry.set_identity(a.clone(), Some(String::new())).await;
        registry.set_identity(b.clone(), None).await;

        // then (期待する結果):
        assert_eq!(registry.lookup(&a).await, Some(DisplayName::guest()));
        assert_eq!(registry.lookup(&b).await, Some(DisplayName::guest()));
    }

    #[tokio::test]
    async fn test_overwrite_with_empty_name_becomes_guest() {
        // テスト項目: 名前を空で上書きすると "Guest" になる（後勝ち）
        // given (前提条件):
        let registry = create_test_registry();
        let a = ConnectionId::new("conn-a");
        registry
            .set_identity(a.clone(), Some("Alice".to_string()))
            .await;

        // when (操作):
        registry.set_identity(a.clone(), Some(String::new())).await;

        // then (期待する結果):
        assert_eq!(registry.lookup(&a).await, Some(DisplayName::guest()));
    }

    #[tokio::test]
    async fn test_get_identity_fallback_when_not_registered() {
        // テスト項目: 未登録の接続はフォールバック名になる
        // given (前提条件):
        let registry = create_test_registry();
        let unknown = ConnectionId::new("unknown");

        // when (操作):
        let guest = registry.get_identity(&unknown, NameFallback::Guest).await;
        let anonymous = registry
            .get_identity(&unknown, NameFallback::Anonymous)
            .await;

        // then (期待する結果):
        assert_eq!(guest.as_str(), "Guest");
        assert_eq!(anonymous.as_str(), "Anonymous");
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // テスト項目: 削除は一度だけ有効で、二回目は何もしない（冪等性）
        // given (前提条件):
        let registry = create_test_registry();
        let a = ConnectionId::new("conn-a");
        registry
            .set_identity(a.clone(), Some("Alice".to_string()))
            .await;

        // when (操作):
        let first = registry.remove(&a).await;
        let second = registry.remove(&a).await;

        // then (期待する結果):
        assert_eq!(first.map(DisplayName::into_string), Some("Alice".to_string()));
        assert_eq!(second, None);
        assert_eq!(
            registry.get_identity(&a, NameFallback::Guest).await,
            DisplayName::guest()
        );
    }

    #[tokio::test]
    async fn test_joined_at_is_kept_on_rename() {
        // テスト項目: 名前を上書きしても参加時刻は変わらない
        // given (前提条件):
        let registry = create_test_registry();
        let a = ConnectionId::new("conn-a");
        registry
            .set_identity(a.clone(), Some("Alice".to_string()))
            .await;

        // when (操作):
        registry.set_identity(a.clone(), Some("Al".to_string())).await;

        // then (期待する結果):
        let participants = registry.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].joined_at, Timestamp::new(1_000));
        assert_eq!(participants[0].name.as_str(), "Al");
    }
}
