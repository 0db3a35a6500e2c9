//! Runtime configuration of the chat session core.

use std::time::Duration;

/// Default typing-indicator debounce window
pub const DEFAULT_TYPING_WINDOW: Duration = Duration::from_millis(2000);
/// Default welcome text sent to a connection after it sets a username
pub const DEFAULT_WELCOME_TEXT: &str = "Welcome to the Simple WebSocket Chat!";
/// Default latency of the welcome text lookup
pub const DEFAULT_WELCOME_DELAY: Duration = Duration::from_millis(1500);
/// Upper bound on how long a welcome lookup may take before it is abandoned
pub const DEFAULT_WELCOME_TIMEOUT: Duration = Duration::from_millis(5000);

/// Chat session settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Idle time after the last `typing` event before `stop typing` is broadcast
    pub typing_window: Duration,
    pub welcome_text: String,
    pub welcome_delay: Duration,
    pub welcome_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_window: DEFAULT_TYPING_WINDOW,
            welcome_text: DEFAULT_WELCOME_TEXT.to_string(),
            welcome_delay: DEFAULT_WELCOME_DELAY,
            welcome_timeout: DEFAULT_WELCOME_TIMEOUT,
        }
    }
}
