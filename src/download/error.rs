use std::time::Duration;

use thiserror::Error;

/// Structured error type for download operations.
///
/// The `Display` text of every variant is shown to the user verbatim, so
/// messages are written for a chat, not for a log file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// No video stream at the requested resolution, or no audio-only stream,
    /// in the preset container
    #[error("Could not find suitable video or audio streams ({missing} stream for {resolution}).")]
    StreamUnavailable { resolution: String, missing: &'static str },

    /// The stream resolver failed (yt-dlp error, unparsable output)
    #[error("Could not read the video's streams: {0}")]
    Resolve(String),

    /// Fetching a stream to local storage failed
    #[error("Failed to download the {kind} stream: {reason}")]
    Fetch { kind: &'static str, reason: String },

    /// ffmpeg exited with a failure status or produced no usable output
    #[error("Failed to merge video and audio: {0}")]
    MuxFailure(String),

    /// The download or mux step ran past its upper bound
    #[error("Download timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Process execution failure (spawn, missing binary)
    #[error("{0}")]
    Process(String),

    /// Local filesystem failures in the working directory
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Returns a short category for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            DownloadError::StreamUnavailable { .. } => "stream_unavailable",
            DownloadError::Resolve(_) => "resolve",
            DownloadError::Fetch { .. } => "fetch",
            DownloadError::MuxFailure(_) => "mux_failure",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::Process(_) => "process",
            DownloadError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_display() {
        let err = DownloadError::StreamUnavailable {
            resolution: "720p".into(),
            missing: "video",
        };
        assert_eq!(
            err.to_string(),
            "Could not find suitable video or audio streams (video stream for 720p)."
        );
        assert_eq!(
            DownloadError::Timeout(Duration::from_secs(900)).to_string(),
            "Download timed out after 900s"
        );
    }

    #[test]
    fn test_download_error_kind() {
        assert_eq!(DownloadError::Resolve("".into()).kind(), "resolve");
        assert_eq!(DownloadError::MuxFailure("".into()).kind(), "mux_failure");
        assert_eq!(DownloadError::Timeout(Duration::ZERO).kind(), "timeout");
        assert_eq!(
            DownloadError::Fetch {
                kind: "audio",
                reason: "".into()
            }
            .kind(),
            "fetch"
        );
    }
}
