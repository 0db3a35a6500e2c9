//! ドメイン層のエラー型

use std::time::Duration;

use thiserror::Error;

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが接続していない
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// 送信チャンネルへの書き込みに失敗（受信側が閉じている）
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// イベントのシリアライズに失敗
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// ウェルカムメッセージ取得のエラー
///
/// 呼び出し側で握りつぶしてログに出すだけ。セッションには影響させない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WelcomeError {
    #[error("Welcome message unavailable: {0}")]
    Unavailable(String),

    #[error("Welcome message timed out after {0:?}")]
    TimedOut(Duration),
}
