//! Resolve → fetch → mux → cleanup for one request.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::config;
use crate::download::error::DownloadError;
use crate::download::muxer::{FfmpegMuxer, Muxer};
use crate::download::stream::{select_audio, select_video, StreamResolver};
use crate::download::workdir::{RequestId, WorkDir};
use crate::download::ytdlp::YtDlpResolver;

const VIDEO_FILE: &str = "video.mp4";
const AUDIO_FILE: &str = "audio.mp4";
const OUTPUT_FILE: &str = "output.mp4";

/// Settings for [`Orchestrator`]
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Parent of every per-request working directory
    pub work_root: PathBuf,
    /// Upper bound for one whole `fetch_and_mux` run
    pub timeout: Duration,
    /// Container the video-only stream must have
    pub video_mime: String,
    /// Container the audio-only stream must have
    pub audio_mime: String,
}

impl OrchestratorConfig {
    pub fn new(work_root: impl Into<PathBuf>) -> Self {
        Self {
            work_root: work_root.into(),
            timeout: Duration::from_secs(config::download::DEFAULT_TIMEOUT_SECS),
            video_mime: config::download::VIDEO_MIME.to_string(),
            audio_mime: config::download::AUDIO_MIME.to_string(),
        }
    }

    /// Config from `WORK_DIR` and `DOWNLOAD_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::new(config::WORK_DIR.clone()).with_timeout(Duration::from_secs(*config::DOWNLOAD_TIMEOUT_SECS))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The muxed file of a finished request.
///
/// Owns the request's working directory: [`DownloadResult::cleanup`] (or
/// dropping the result) deletes the output file.
#[derive(Debug)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub byte_size: u64,
    workdir: WorkDir,
}

impl DownloadResult {
    /// Working directory the output lives in
    pub fn work_dir(&self) -> &Path {
        self.workdir.path()
    }

    /// Deletes the output file and its working directory
    pub async fn cleanup(self) {
        self.workdir.remove().await;
    }
}

/// Drives one download request end to end.
pub struct Orchestrator {
    resolver: Arc<dyn StreamResolver>,
    muxer: Arc<dyn Muxer>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(resolver: Arc<dyn StreamResolver>, muxer: Arc<dyn Muxer>, config: OrchestratorConfig) -> Self {
        Self {
            resolver,
            muxer,
            config,
        }
    }

    /// Production orchestrator: yt-dlp resolver and ffmpeg muxer, configured from the environment
    pub fn from_env() -> Result<Self, DownloadError> {
        Ok(Self::new(
            Arc::new(YtDlpResolver::from_env()?),
            Arc::new(FfmpegMuxer::from_env()),
            OrchestratorConfig::from_env(),
        ))
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Downloads the `resolution` video stream and an audio stream of `url`
    /// and merges them into one file.
    ///
    /// Fails with `StreamUnavailable` before touching the filesystem when
    /// either stream is missing, and with `Timeout` when the whole run exceeds
    /// the configured bound.
    pub async fn fetch_and_mux(
        &self,
        id: &RequestId,
        url: &str,
        resolution: &str,
    ) -> Result<DownloadResult, DownloadError> {
        match tokio::time::timeout(self.config.timeout, self.run(id, url, resolution)).await {
            Ok(result) => result,
            Err(_) => {
                log::error!("[{}] download timed out after {:?}", id, self.config.timeout);
                Err(DownloadError::Timeout(self.config.timeout))
            }
        }
    }

    async fn run(&self, id: &RequestId, url: &str, resolution: &str) -> Result<DownloadResult, DownloadError> {
        let streams = self.resolver.resolve(url).await?;

        let video = select_video(&streams, resolution, &self.config.video_mime).ok_or_else(|| {
            DownloadError::StreamUnavailable {
                resolution: resolution.to_string(),
                missing: "video",
            }
        })?;
        let audio = select_audio(&streams, &self.config.audio_mime).ok_or_else(|| DownloadError::StreamUnavailable {
            resolution: resolution.to_string(),
            missing: "audio",
        })?;
        log::info!(
            "[{}] selected video format {} and audio format {} via {}",
            id,
            video.handle.format_id,
            audio.handle.format_id,
            self.resolver.name()
        );

        let workdir = WorkDir::create(&self.config.work_root, id).await?;
        let video_path = workdir.file(VIDEO_FILE);
        let audio_path = workdir.file(AUDIO_FILE);
        let output_path = workdir.file(OUTPUT_FILE);

        let fetched = tokio::try_join!(
            self.resolver.fetch(video, &video_path),
            self.resolver.fetch(audio, &audio_path),
        );
        let (video_bytes, audio_bytes) = match fetched {
            Ok(bytes) => bytes,
            Err(e) => {
                workdir.remove().await;
                return Err(e);
            }
        };
        log::info!("[{}] fetched video {} bytes, audio {} bytes", id, video_bytes, audio_bytes);

        let mux_result = self.muxer.mux(&video_path, &audio_path, &output_path).await;
        workdir.remove_file(&video_path).await;
        workdir.remove_file(&audio_path).await;
        if let Err(e) = mux_result {
            workdir.remove().await;
            return Err(e);
        }

        let byte_size = match fs_err::tokio::metadata(&output_path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::error!("[{}] mux output missing: {}", id, e);
                0
            }
        };
        if byte_size == 0 {
            workdir.remove().await;
            return Err(DownloadError::MuxFailure("ffmpeg produced no output".to_string()));
        }

        log::info!("[{}] muxed {} ({} bytes)", id, output_path.display(), byte_size);
        Ok(DownloadResult {
            path: output_path,
            byte_size,
            workdir,
        })
    }
}
