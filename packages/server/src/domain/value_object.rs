//! 値オブジェクト

use std::fmt;

use serde::{Deserialize, Serialize};

/// 表示名が未設定・空のときに join 時に使われる名前
pub const GUEST_NAME: &str = "Guest";
/// join 前に名前が参照されたときに使われる名前
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// 接続 ID
///
/// トランスポート層が接続受付時に割り当てる不透明な ID。接続が生きている間は一意。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 接続 ID の生成
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 ベースの接続 ID を生成
    pub fn generate() -> ConnectionId {
        ConnectionId(uuid::Uuid::new_v4().to_string())
    }
}

/// 表示名
///
/// 利用時点で空になることはない。空・未指定の入力は `"Guest"` に置き換える。
/// 接続間での一意性は保証しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// クライアントから受け取った名前を表示名に変換（空・未指定は `"Guest"`）
    pub fn from_input(input: Option<String>) -> Self {
        match input {
            Some(name) if !name.is_empty() => Self(name),
            _ => Self::guest(),
        }
    }

    pub fn guest() -> Self {
        Self(GUEST_NAME.to_string())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示名が未登録の接続を参照したときのフォールバック
///
/// 呼び出し箇所ごとに使い分ける（チャットは `Guest`、typing / 個別メッセージは `Anonymous`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFallback {
    Guest,
    Anonymous,
}

impl NameFallback {
    pub fn display_name(self) -> DisplayName {
        match self {
            NameFallback::Guest => DisplayName::guest(),
            NameFallback::Anonymous => DisplayName::anonymous(),
        }
    }
}

/// Unix タイムスタンプ（UTC, ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_keeps_non_empty_input() {
        // テスト項目: 空でない名前はそのまま表示名になる
        // given (前提条件):
        let input = Some("Alice".to_string());

        // when (操作):
        let name = DisplayName::from_input(input);

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_display_name_coerces_empty_and_missing_to_guest() {
        // テスト項目: 空文字列・未指定の名前は "Guest" に置き換えられる
        // given (前提条件):
        let empty = Some(String::new());
        let missing = None;

        // when (操作):
        let from_empty = DisplayName::from_input(empty);
        let from_missing = DisplayName::from_input(missing);

        // then (期待する結果):
        assert_eq!(from_empty, DisplayName::guest());
        assert_eq!(from_missing.as_str(), "Guest");
    }

    #[test]
    fn test_display_name_does_not_trim_whitespace() {
        // テスト項目: 空白のみの名前は空とはみなさない
        // given (前提条件):
        let input = Some(" ".to_string());

        // when (操作):
        let name = DisplayName::from_input(input);

        // then (期待する結果):
        assert_eq!(name.as_str(), " ");
    }

    #[test]
    fn test_name_fallback_resolves_per_call_site() {
        // テスト項目: フォールバック種別ごとに既定の名前が返る
        // when (操作) / then (期待する結果):
        assert_eq!(NameFallback::Guest.display_name().as_str(), "Guest");
        assert_eq!(NameFallback::Anonymous.display_name().as_str(), "Anonymous");
    }

    #[test]
    fn test_connection_id_factory_generates_unique_ids() {
        // テスト項目: 生成される接続 ID は毎回異なる
        // when (操作):
        let first = ConnectionIdFactory::generate();
        let second = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(!first.as_str().is_empty());
    }
}
