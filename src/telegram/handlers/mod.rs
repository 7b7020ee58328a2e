//! Telegram bot handler tree configuration
//!
//! The handler logic that decides what to reply lives in plain functions
//! (`text_reply`, `prepare_download`) so it can be tested without a bot.

mod commands;
mod messages;
mod schema;
mod types;

pub use messages::{prepare_download, text_reply};
pub use schema::schema;
pub use types::{display_name, HandlerDeps, HandlerError};
