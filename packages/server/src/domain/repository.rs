//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, DisplayName, NameFallback, Participant};

/// Connection Registry trait
///
/// 「誰がどの名前でオンラインか」の唯一の情報源。
/// 接続 ID → 表示名 の対応を保持する。エントリは最初の表示名設定時に作られ、
/// 切断時に一度だけ削除される。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 表示名を登録（既にあれば上書き）
    ///
    /// 空・未指定の名前は `"Guest"` に置き換える。失敗しない。
    /// 実際に登録された表示名を返す。
    async fn set_identity(
        &self,
        connection_id: ConnectionId,
        name: Option<String>,
    ) -> DisplayName;

    /// 登録済みの表示名を取得
    async fn lookup(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// 表示名を取得（未登録ならフォールバック）
    async fn get_identity(
        &self,
        connection_id: &ConnectionId,
        fallback: NameFallback,
    ) -> DisplayName {
        self.lookup(connection_id)
            .await
            .unwrap_or_else(|| fallback.display_name())
    }

    /// エントリを削除（存在しなければ何もしない）
    ///
    /// 削除した場合はその表示名を返す。
    async fn remove(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// 登録済みの参加者一覧
    async fn participants(&self) -> Vec<Participant>;
}
