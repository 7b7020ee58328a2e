//! Common test utilities
//!
//! Stub implementations of the resolver, muxer and chat sink traits, shared
//! across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::ChatId;
use teloxide::{ApiError, RequestError};

use tubemux::download::{DownloadError, Muxer, StreamDescriptor, StreamHandle, StreamResolver};
use tubemux::telegram::{ChatSink, StatusMessage};
use tubemux::{Orchestrator, OrchestratorConfig};

/// Video and audio streams whose handle URL is `<url>#video` / `<url>#audio`
pub fn streams_for(url: &str) -> Vec<StreamDescriptor> {
    vec![
        StreamDescriptor::video("1080p", "video/mp4", handle(url, "video1080")),
        StreamDescriptor::video("720p", "video/webm", handle(url, "video-webm")),
        StreamDescriptor::video("720p", "video/mp4", handle(url, "video")),
        StreamDescriptor::audio("audio/webm", handle(url, "audio-webm")),
        StreamDescriptor::audio("audio/mp4", handle(url, "audio")),
    ]
}

fn handle(url: &str, tag: &str) -> StreamHandle {
    StreamHandle {
        url: format!("{}#{}", url, tag),
        format_id: tag.to_string(),
        ..Default::default()
    }
}

/// Resolver that returns canned streams and "downloads" by writing the
/// handle URL into the destination file.
#[derive(Default)]
pub struct StubResolver {
    pub without_audio: bool,
    pub fetch_delay: Duration,
    pub fetch_calls: AtomicUsize,
}

impl StubResolver {
    pub fn without_audio() -> Self {
        Self {
            without_audio: true,
            ..Default::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            fetch_delay: delay,
            ..Default::default()
        }
    }
}

#[async_trait]
impl StreamResolver for StubResolver {
    fn name(&self) -> &str {
        "stub"
    }

    async fn resolve(&self, url: &str) -> Result<Vec<StreamDescriptor>, DownloadError> {
        let mut streams = streams_for(url);
        if self.without_audio {
            streams.retain(|s| s.resolution.is_some());
        }
        Ok(streams)
    }

    async fn fetch(&self, stream: &StreamDescriptor, dest: &Path) -> Result<u64, DownloadError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.fetch_delay).await;
        tokio::fs::write(dest, stream.handle.url.as_bytes()).await?;
        Ok(stream.handle.url.len() as u64)
    }
}

/// What [`StubMuxer`] does when called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuxBehavior {
    /// Writes `<video bytes>|<audio bytes>` to the output
    #[default]
    Concatenate,
    /// Returns a mux failure without writing anything
    Fail,
    /// Reports success but writes no output
    NoOutput,
}

#[derive(Default)]
pub struct StubMuxer {
    pub behavior: MuxBehavior,
    pub calls: AtomicUsize,
    /// Whether both inputs existed when mux was called
    pub inputs_present: Mutex<Vec<bool>>,
}

impl StubMuxer {
    pub fn with_behavior(behavior: MuxBehavior) -> Self {
        Self {
            behavior,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Muxer for StubMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs_present
            .lock()
            .unwrap()
            .push(video.exists() && audio.exists());

        match self.behavior {
            MuxBehavior::Concatenate => {
                let mut merged = tokio::fs::read(video).await?;
                merged.push(b'|');
                merged.extend(tokio::fs::read(audio).await?);
                tokio::fs::write(output, merged).await?;
                Ok(())
            }
            MuxBehavior::Fail => Err(DownloadError::MuxFailure("stub failure".into())),
            MuxBehavior::NoOutput => Ok(()),
        }
    }
}

/// One call recorded by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Edit(String),
    /// Video path, whether it existed, and its contents at send time
    Video {
        path: PathBuf,
        existed: bool,
        contents: Vec<u8>,
    },
}

#[derive(Default)]
pub struct RecordingSink {
    pub calls: Mutex<Vec<SinkCall>>,
    pub fail_send: bool,
}

impl RecordingSink {
    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::Edit(text) => Some(text),
                SinkCall::Video { .. } => None,
            })
            .collect()
    }

    pub fn sent_video_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::Video { path, .. } => Some(path),
                SinkCall::Edit(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn edit_status(&self, _status: StatusMessage, text: &str) -> Result<(), RequestError> {
        self.calls.lock().unwrap().push(SinkCall::Edit(text.to_string()));
        Ok(())
    }

    async fn send_video(&self, _chat_id: ChatId, path: &Path) -> Result<(), RequestError> {
        let contents = std::fs::read(path).unwrap_or_default();
        self.calls.lock().unwrap().push(SinkCall::Video {
            path: path.to_path_buf(),
            existed: path.exists(),
            contents,
        });
        if self.fail_send {
            return Err(RequestError::Api(ApiError::BotBlocked));
        }
        Ok(())
    }
}

/// Orchestrator over the given stubs, working under `work_root`
pub fn orchestrator(resolver: Arc<StubResolver>, muxer: Arc<StubMuxer>, work_root: &Path) -> Orchestrator {
    Orchestrator::new(resolver, muxer, OrchestratorConfig::new(work_root))
}

/// Number of entries directly under `dir` (0 if it does not exist)
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
