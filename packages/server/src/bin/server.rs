//! Hiroba chat server.
//!
//! Tracks who is online as whom and relays chat, private, reaction and typing
//! events between WebSocket connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3002 --typing-window-ms 2000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    config::{ChatConfig, DEFAULT_WELCOME_TEXT},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        welcome::DelayedWelcomeMessage,
    },
    ui::Server,
    usecase::{ListParticipantsUseCase, SessionController},
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket chat server with presence and private messaging", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3002")]
    port: u16,

    /// Idle time after the last typing event before "stop typing" is sent
    #[arg(long, default_value = "2000")]
    typing_window_ms: u64,

    /// Text sent to a connection after it sets a username
    #[arg(long, default_value = DEFAULT_WELCOME_TEXT)]
    welcome_text: String,

    /// Simulated latency of the welcome text lookup
    #[arg(long, default_value = "1500")]
    welcome_delay_ms: u64,

    /// Give up on the welcome text after this long
    #[arg(long, default_value = "5000")]
    welcome_timeout_ms: u64,
}

impl Args {
    fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            typing_window: Duration::from_millis(self.typing_window_ms),
            welcome_text: self.welcome_text.clone(),
            welcome_delay: Duration::from_millis(self.welcome_delay_ms),
            welcome_timeout: Duration::from_millis(self.welcome_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = args.chat_config();
    tracing::debug!("Starting with {:?}", config);

    // Initialize dependencies in order:
    // 1. Registry / MessagePusher / welcome collaborator
    // 2. UseCases
    // 3. Server
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let welcome = Arc::new(DelayedWelcomeMessage::new(
        config.welcome_text.clone(),
        config.welcome_delay,
    ));

    let session_controller = Arc::new(SessionController::new(
        registry.clone(),
        message_pusher,
        welcome,
        &config,
    ));
    let list_participants_usecase = Arc::new(ListParticipantsUseCase::new(registry));

    let server = Server::new(session_controller, list_participants_usecase);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
