//! Unified messaging system for session operations

use crate::environment::Environment;

// ANSI Color Codes for session messages
pub const COLOR_INFO: &str = "\x1b[1;36m"; // Bold Cyan
pub const COLOR_SUCCESS: &str = "\x1b[1;32m"; // Bold Green
pub const COLOR_RESET: &str = "\x1b[0m";

/// Session-specific message types
#[derive(Debug, Clone)]
pub enum SessionMessage {
    Info(String),
    Success(String),
}

impl SessionMessage {
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }

    /// Text as printed, without colors.
    pub fn plain(&self) -> String {
        match self {
            Self::Info(msg) => format!("[INFO] {}", msg),
            Self::Success(msg) => format!("[SUCCESS] {}", msg),
        }
    }

    pub fn print(&self) {
        match self {
            Self::Info(msg) => {
                println!("{}[INFO]{} {}", COLOR_INFO, COLOR_RESET, msg);
            }
            Self::Success(msg) => {
                println!("{}[SUCCESS]{} {}", COLOR_SUCCESS, COLOR_RESET, msg);
            }
        }
    }
}

pub fn session_starting(mode: &str, environment: &Environment) -> SessionMessage {
    SessionMessage::info(format!(
        "Starting {} mode against {}",
        mode,
        environment.api_url()
    ))
}

pub fn print_session_starting(mode: &str, environment: &Environment) {
    session_starting(mode, environment).print();
}

pub fn print_session_shutdown() {
    SessionMessage::info("Shutting down...").print();
}

pub fn print_session_exit_success() {
    SessionMessage::success("Spotilike exited successfully").print();
}
