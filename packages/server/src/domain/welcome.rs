//! ウェルカムメッセージ取得の外部コラボレータ

use async_trait::async_trait;

use super::WelcomeError;

/// 表示名を設定した接続に送るウェルカムメッセージを非同期に取得する
///
/// 実装（タイマー、ネットワーク呼び出し、固定文言）はセッション管理からは見えない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WelcomeMessageProvider: Send + Sync {
    async fn fetch_welcome(&self) -> Result<String, WelcomeError>;
}
