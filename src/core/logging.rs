//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A panic hook that routes panics into the log
//! - Logging of external tool configuration at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs panics (with location) instead of only printing them to stderr.
///
/// Download jobs run in spawned tasks; a panic there would otherwise vanish.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        log::error!("Panic at {}: {}", location, message);
    }));
}

/// Logs which external binaries and directories the bot will use
pub fn log_tools_configuration() {
    log::info!("yt-dlp binary: {}", config::YTDL_BIN.as_str());
    log::info!("ffmpeg binary: {}", config::FFMPEG_BIN.as_str());
    log::info!("Working directory root: {}", config::WORK_DIR.display());
    log::info!("Download timeout: {}s", *config::DOWNLOAD_TIMEOUT_SECS);
    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("Bot API server: {}", url),
        None => log::info!("Bot API server: api.telegram.org"),
    }
}
