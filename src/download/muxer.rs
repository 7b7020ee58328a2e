//! Combining a video-only and an audio-only file into one container.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::config;
use crate::core::process::{run_with_timeout, stderr_tail};
use crate::download::error::DownloadError;

/// Produces `output` from a local video file and a local audio file.
#[async_trait]
pub trait Muxer: Send + Sync {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), DownloadError>;
}

/// Muxer that shells out to ffmpeg: video is copied verbatim, audio is
/// re-encoded into AAC.
pub struct FfmpegMuxer {
    ffmpeg_bin: String,
    timeout: Duration,
}

impl FfmpegMuxer {
    pub fn new(ffmpeg_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            timeout,
        }
    }

    /// Muxer using the `FFMPEG_BIN` binary and the configured download timeout
    pub fn from_env() -> Self {
        Self::new(
            config::FFMPEG_BIN.as_str(),
            Duration::from_secs(*config::DOWNLOAD_TIMEOUT_SECS),
        )
    }

    /// Arguments for one mux run
    pub fn args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        for arg in [
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "copy",
            "-c:a",
            config::download::AUDIO_CODEC,
            "-strict",
            "experimental",
        ] {
            args.push(arg.into());
        }
        args.push(output.into());
        args
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), DownloadError> {
        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.args(Self::args(video, audio, output));

        let result = run_with_timeout(&self.ffmpeg_bin, &mut cmd, self.timeout).await?;
        if !result.status.success() {
            let tail = stderr_tail(&result);
            log::error!("ffmpeg exited with {:?}: {}", result.status.code(), tail);
            return Err(DownloadError::MuxFailure(if tail.is_empty() {
                format!("ffmpeg exited with status {:?}", result.status.code())
            } else {
                tail
            }));
        }

        log::info!("ffmpeg merged {} + {}", video.display(), audio.display());
        Ok(())
    }
}
