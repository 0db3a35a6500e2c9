//! イベントの宛先決定
//!
//! 送信者・生きている接続・宛先指定から、配送先の接続を決める純粋関数。

use super::ConnectionId;

/// 宛先の指定方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// 送信者を含む全ての接続
    All,
    /// 送信者以外の全ての接続
    AllExcept(ConnectionId),
    /// 指定した接続のみ
    Only(ConnectionId),
}

/// 生きている接続の中から配送先を決める
///
/// `Only` の宛先が生きていなければ空になる。結果に重複は含まれない。
pub fn resolve_recipients(recipients: &Recipients, live: &[ConnectionId]) -> Vec<ConnectionId> {
    match recipients {
        Recipients::All => live.to_vec(),
        Recipients::AllExcept(sender) => live.iter().filter(|id| *id != sender).cloned().collect(),
        Recipients::Only(target) => live
            .iter()
            .find(|id| *id == target)
            .cloned()
            .into_iter()
            .collect(),
    }
}
