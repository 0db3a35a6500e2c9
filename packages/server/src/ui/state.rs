//! Server state shared by handlers.

use std::sync::Arc;

use crate::usecase::{ListParticipantsUseCase, SessionController};

/// Shared application state
pub struct AppState {
    /// SessionController（接続ごとのセッション状態遷移）
    pub session_controller: Arc<SessionController>,
    /// ListParticipantsUseCase（参加者一覧の取得）
    pub list_participants_usecase: Arc<ListParticipantsUseCase>,
}
