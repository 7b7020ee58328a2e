//! Stream descriptors and the resolver abstraction.
//!
//! A `StreamResolver` turns a video URL into the list of separately
//! downloadable tracks and knows how to fetch one of them to disk. The
//! orchestrator only ever talks to this trait, so tests can swap in stubs.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::download::error::DownloadError;

/// Whether a stream carries only video or only audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to fetch a stream's bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamHandle {
    /// Direct media URL
    pub url: String,
    /// Headers that must accompany requests to `url`
    pub http_headers: HashMap<String, String>,
    /// Resolver-specific identifier (yt-dlp format id)
    pub format_id: String,
    /// Size reported by the resolver, possibly approximate. Only logged.
    pub size_hint: Option<u64>,
    /// Exact byte length, when the resolver knows it
    pub exact_size: Option<u64>,
}

/// One downloadable track of a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub kind: StreamKind,
    /// Only set for video streams, e.g. "720p"
    pub resolution: Option<String>,
    /// Container mime type, e.g. "video/mp4" or "audio/mp4"
    pub mime_type: String,
    pub handle: StreamHandle,
}

impl StreamDescriptor {
    pub fn video(resolution: impl Into<String>, mime_type: impl Into<String>, handle: StreamHandle) -> Self {
        Self {
            kind: StreamKind::Video,
            resolution: Some(resolution.into()),
            mime_type: mime_type.into(),
            handle,
        }
    }

    pub fn audio(mime_type: impl Into<String>, handle: StreamHandle) -> Self {
        Self {
            kind: StreamKind::Audio,
            resolution: None,
            mime_type: mime_type.into(),
            handle,
        }
    }
}

/// Source of stream descriptors for a video URL.
#[async_trait]
pub trait StreamResolver: Send + Sync {
    /// Human-readable name of this resolver (e.g. "yt-dlp")
    fn name(&self) -> &str;

    /// Lists the video-only and audio-only streams available for `url`.
    async fn resolve(&self, url: &str) -> Result<Vec<StreamDescriptor>, DownloadError>;

    /// Writes the stream's bytes to `dest`, returning the number of bytes written.
    async fn fetch(&self, stream: &StreamDescriptor, dest: &Path) -> Result<u64, DownloadError>;
}

/// First video-only stream with exactly `resolution` in the `mime_type` container.
///
/// No scoring and no fallback to a nearby resolution.
pub fn select_video<'a>(
    streams: &'a [StreamDescriptor],
    resolution: &str,
    mime_type: &str,
) -> Option<&'a StreamDescriptor> {
    streams.iter().find(|s| {
        s.kind == StreamKind::Video && s.resolution.as_deref() == Some(resolution) && s.mime_type == mime_type
    })
}

/// First audio-only stream in the `mime_type` container.
pub fn select_audio<'a>(streams: &'a [StreamDescriptor], mime_type: &str) -> Option<&'a StreamDescriptor> {
    streams
        .iter()
        .find(|s| s.kind == StreamKind::Audio && s.mime_type == mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: &str) -> StreamHandle {
        StreamHandle {
            format_id: id.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<StreamDescriptor> {
        vec![
            StreamDescriptor::video("1080p", "video/mp4", handle("137")),
            StreamDescriptor::video("720p", "video/webm", handle("247")),
            StreamDescriptor::video("720p", "video/mp4", handle("136")),
            StreamDescriptor::video("720p", "video/mp4", handle("398")),
            StreamDescriptor::audio("audio/webm", handle("251")),
            StreamDescriptor::audio("audio/mp4", handle("140")),
            StreamDescriptor::audio("audio/mp4", handle("139")),
        ]
    }

    #[test]
    fn test_select_video_first_exact_match() {
        let streams = sample();
        let video = select_video(&streams, "720p", "video/mp4").unwrap();
        assert_eq!(video.handle.format_id, "136");
    }

    #[test]
    fn test_select_video_has_no_fallback() {
        let streams = sample();
        assert!(select_video(&streams, "480p", "video/mp4").is_none());
        assert!(select_video(&streams, "1080p", "video/webm").is_none());
    }

    #[test]
    fn test_select_audio_first_match() {
        let streams = sample();
        assert_eq!(select_audio(&streams, "audio/mp4").unwrap().handle.format_id, "140");
        assert_eq!(select_audio(&streams, "audio/webm").unwrap().handle.format_id, "251");
        assert!(select_audio(&streams, "audio/ogg").is_none());
    }

    #[test]
    fn test_audio_streams_never_match_video_selection() {
        let streams = vec![StreamDescriptor {
            kind: StreamKind::Audio,
            resolution: Some("720p".into()),
            mime_type: "video/mp4".into(),
            handle: handle("x"),
        }];
        assert!(select_video(&streams, "720p", "video/mp4").is_none());
    }
}
