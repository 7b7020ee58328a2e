//! tubemux - Telegram bot that sends back YouTube videos at a chosen resolution
//!
//! The bot takes a YouTube link, asks for a resolution, downloads the matching
//! video-only and audio-only streams and merges them with ffmpeg.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, process helpers, link validation
//! - `download`: stream resolution, fetching, muxing and per-request cleanup
//! - `telegram`: conversation state, handlers and result delivery

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use download::{DownloadError, DownloadResult, Orchestrator, OrchestratorConfig, RequestId};
pub use telegram::{schema, ConversationState, HandlerDeps};
