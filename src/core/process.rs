//! Process execution utilities with timeout support
//!
//! Provides helpers for running external processes (ffmpeg, yt-dlp)
//! with configurable timeouts so a hung process cannot block a download job.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::download::error::DownloadError;

/// Run an async Command with a timeout.
///
/// The child is killed when the timeout fires (`kill_on_drop`).
/// `program` is only used to label errors.
pub async fn run_with_timeout(program: &str, cmd: &mut Command, timeout: Duration) -> Result<Output, DownloadError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(DownloadError::Process(format!("failed to run {}: {}", program, e))),
        Err(_) => Err(DownloadError::Timeout(timeout)),
    }
}

/// Last non-empty line of a process' stderr, for error messages
pub fn stderr_tail(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}
