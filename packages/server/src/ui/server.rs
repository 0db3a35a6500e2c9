//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{ListParticipantsUseCase, SessionController};

use super::{
    handler::{health_check, list_participants, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(session_controller, list_participants_usecase);
/// server.run("127.0.0.1".to_string(), 3002).await?;
/// ```
pub struct Server {
    /// SessionController（接続ごとのセッション状態遷移）
    session_controller: Arc<SessionController>,
    /// ListParticipantsUseCase（参加者一覧の取得）
    list_participants_usecase: Arc<ListParticipantsUseCase>,
}

impl Server {
    pub fn new(
        session_controller: Arc<SessionController>,
        list_participants_usecase: Arc<ListParticipantsUseCase>,
    ) -> Self {
        Self {
            session_controller,
            list_participants_usecase,
        }
    }

    /// Build the axum router without binding
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            session_controller: self.session_controller,
            list_participants_usecase: self.list_participants_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(list_participants))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3002)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
