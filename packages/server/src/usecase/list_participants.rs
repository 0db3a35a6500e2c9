//! UseCase: 参加者一覧の取得

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Participant};

/// 表示名を設定済みの参加者一覧を取得するユースケース
pub struct ListParticipantsUseCase {
    /// Registry（接続 ID → 表示名）
    registry: Arc<dyn ConnectionRegistry>,
}

impl ListParticipantsUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者一覧（参加時刻順、同時刻なら接続 ID 順）
    pub async fn execute(&self) -> Vec<Participant> {
        let mut participants = self.registry.participants().await;
        participants.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.id.cmp(&b.id)));
        participants
    }
}
