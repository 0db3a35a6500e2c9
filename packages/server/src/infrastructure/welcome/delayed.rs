//! 一定時間待ってから固定の文言を返すウェルカムメッセージ
//!
//! 外部サービスの呼び出しを模したもの。遅延中も他の接続のイベント処理は止まらない。

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{WelcomeError, WelcomeMessageProvider};

pub struct DelayedWelcomeMessage {
    text: String,
    delay: Duration,
}

impl DelayedWelcomeMessage {
    pub fn new(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay,
        }
    }
}

#[async_trait]
impl WelcomeMessageProvider for DelayedWelcomeMessage {
    async fn fetch_welcome(&self) -> Result<String, WelcomeError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.text.clone())
    }
}
