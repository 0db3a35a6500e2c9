//! ウェルカムメッセージ取得の実装

pub mod delayed;

pub use delayed::DelayedWelcomeMessage;
