//! Telegram bot integration and handlers

pub mod bot;
pub mod delivery;
pub mod handlers;
pub mod replies;
pub mod state;

/// Bot type used across handlers
pub type Bot = teloxide::Bot;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use delivery::{run_download_job, spawn_download_job, ChatSink, DownloadJob, StatusMessage};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use state::{ConversationState, PendingRequest};
