//! yt-dlp backed stream resolver.
//!
//! `yt-dlp -J` only lists the formats and their direct CDN URLs; the bytes
//! are pulled with `reqwest` in ranged chunks, the way yt-dlp itself does for
//! YouTube DASH formats (unchunked requests get throttled).

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::core::config;
use crate::core::process::{run_with_timeout, stderr_tail};
use crate::download::error::DownloadError;
use crate::download::stream::{StreamDescriptor, StreamHandle, StreamResolver};

/// Size of one ranged request
const HTTP_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    #[serde(default)]
    format_id: String,
    url: Option<String>,
    ext: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    height: Option<u32>,
    protocol: Option<String>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
    #[serde(default)]
    http_headers: HashMap<String, String>,
}

impl YtDlpFormat {
    fn has_codec(codec: &Option<String>) -> Option<bool> {
        codec.as_deref().map(|c| c != "none")
    }

    /// Converts a yt-dlp format into a descriptor, skipping muxed formats,
    /// storyboards and manifest-based (HLS/DASH manifest) protocols.
    fn into_descriptor(self) -> Option<StreamDescriptor> {
        let url = self.url?;
        if !matches!(self.protocol.as_deref(), None | Some("https") | Some("http")) {
            return None;
        }

        let ext = self.ext.as_deref().unwrap_or_default();
        let has_video = Self::has_codec(&self.vcodec)?;
        let has_audio = Self::has_codec(&self.acodec)?;

        let handle = StreamHandle {
            url,
            http_headers: self.http_headers,
            format_id: self.format_id,
            size_hint: self.filesize.or(self.filesize_approx),
            exact_size: self.filesize,
        };

        match (has_video, has_audio) {
            (true, false) => {
                let mime = video_mime_for_ext(ext)?;
                let resolution = format!("{}p", self.height?);
                Some(StreamDescriptor::video(resolution, mime, handle))
            }
            (false, true) => {
                let mime = audio_mime_for_ext(ext)?;
                Some(StreamDescriptor::audio(mime, handle))
            }
            _ => None,
        }
    }
}

fn video_mime_for_ext(ext: &str) -> Option<&'static str> {
    match ext {
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "3gp" => Some("video/3gpp"),
        _ => None,
    }
}

fn audio_mime_for_ext(ext: &str) -> Option<&'static str> {
    match ext {
        "m4a" | "mp4" => Some("audio/mp4"),
        "webm" => Some("audio/webm"),
        "mp3" => Some("audio/mpeg"),
        "opus" | "ogg" => Some("audio/ogg"),
        _ => None,
    }
}

/// Parses `yt-dlp -J` output into stream descriptors, keeping yt-dlp's order.
pub fn parse_formats(json: &str) -> Result<Vec<StreamDescriptor>, DownloadError> {
    let info: YtDlpInfo = serde_json::from_str(json)
        .map_err(|e| DownloadError::Resolve(format!("failed to parse yt-dlp output: {}", e)))?;
    Ok(info
        .formats
        .into_iter()
        .filter_map(YtDlpFormat::into_descriptor)
        .collect())
}

/// Total length from a `Content-Range: bytes 0-99/1234` header
fn content_range_total(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.rsplit('/').next())
        .and_then(|s| s.parse::<u64>().ok())
}

/// Resolver that lists formats with yt-dlp and downloads them over HTTP.
pub struct YtDlpResolver {
    ytdl_bin: String,
    client: Client,
    resolve_timeout: Duration,
    chunk_size: u64,
}

impl YtDlpResolver {
    pub fn new(ytdl_bin: impl Into<String>) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(config::network::connect_timeout())
            .build()
            .map_err(|e| DownloadError::Process(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            ytdl_bin: ytdl_bin.into(),
            client,
            resolve_timeout: config::download::resolve_timeout(),
            chunk_size: HTTP_CHUNK_SIZE,
        })
    }

    /// Overrides the size of one ranged request
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Resolver using the `YTDL_BIN` binary
    pub fn from_env() -> Result<Self, DownloadError> {
        Self::new(config::YTDL_BIN.as_str())
    }

    fn request(&self, stream: &StreamDescriptor) -> reqwest::RequestBuilder {
        let mut req = self.client.get(&stream.handle.url);
        for (name, value) in &stream.handle.http_headers {
            req = req.header(name.as_str(), value.as_str());
        }
        req
    }
}

#[async_trait]
impl StreamResolver for YtDlpResolver {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<Vec<StreamDescriptor>, DownloadError> {
        let mut cmd = Command::new(&self.ytdl_bin);
        cmd.args(["-J", "--no-playlist", "--no-warnings", url]);

        let output = run_with_timeout(&self.ytdl_bin, &mut cmd, self.resolve_timeout).await?;
        if !output.status.success() {
            return Err(DownloadError::Resolve(stderr_tail(&output)));
        }

        let streams = parse_formats(&String::from_utf8_lossy(&output.stdout))?;
        log::info!("yt-dlp listed {} separate streams for {}", streams.len(), url);
        Ok(streams)
    }

    async fn fetch(&self, stream: &StreamDescriptor, dest: &Path) -> Result<u64, DownloadError> {
        let kind = stream.kind.as_str();
        let fetch_err = |reason: String| DownloadError::Fetch { kind, reason };

        let mut file = fs_err::tokio::File::create(dest).await?;
        let mut written: u64 = 0;
        // Only an exact length may end the download; approximate sizes are never a stop bound.
        let mut total = stream.handle.exact_size;

        loop {
            let end = written + self.chunk_size - 1;
            let response = self
                .request(stream)
                .header(RANGE, format!("bytes={}-{}", written, end))
                .send()
                .await
                .map_err(|e| fetch_err(e.to_string()))?;

            let status = response.status();
            // Length unknown and the previous chunk ended exactly at EOF
            if status == StatusCode::RANGE_NOT_SATISFIABLE && written > 0 && total.is_none() {
                break;
            }
            if !status.is_success() {
                return Err(fetch_err(format!("HTTP {}", status)));
            }

            // Servers that ignore Range answer 200 with the whole body.
            let whole_body = status != StatusCode::PARTIAL_CONTENT;
            if whole_body && written > 0 {
                return Err(fetch_err("server stopped honouring range requests".to_string()));
            }
            if !whole_body {
                if let Some(range_total) = content_range_total(&response) {
                    total = Some(range_total);
                }
            }

            let mut body = response.bytes_stream();
            let mut chunk_len: u64 = 0;
            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(|e| fetch_err(format!("error reading chunk: {}", e)))?;
                file.write_all(&chunk).await?;
                chunk_len += chunk.len() as u64;
            }
            written += chunk_len;

            let finished = match total {
                _ if whole_body => true,
                Some(total) => written >= total,
                None => chunk_len < self.chunk_size,
            };
            if finished {
                break;
            }
            if chunk_len == 0 {
                return Err(fetch_err(format!("empty range at byte {}", written)));
            }
        }

        if let Some(total) = total {
            if written < total {
                return Err(fetch_err(format!("stream ended after {} of {} bytes", written, total)));
            }
        }

        file.flush().await?;
        log::info!(
            "Fetched {} stream (format {}): {} bytes (reported {:?})",
            kind,
            stream.handle.format_id,
            written,
            stream.handle.size_hint
        );
        Ok(written)
    }
}

/// Logs the installed yt-dlp version; a missing binary is only a warning here,
/// the first download reports it to the user.
pub async fn log_ytdlp_version(ytdl_bin: &str) {
    let mut cmd = Command::new(ytdl_bin);
    cmd.arg("--version");
    match run_with_timeout(ytdl_bin, &mut cmd, Duration::from_secs(15)).await {
        Ok(output) if output.status.success() => {
            log::info!(
                "yt-dlp version: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }
        Ok(output) => log::warn!("yt-dlp --version failed: {}", stderr_tail(&output)),
        Err(e) => log::warn!("Failed to get yt-dlp version: {}", e),
    }
}
