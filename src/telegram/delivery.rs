//! Background download jobs and delivering their result to the chat.
//!
//! A job runs in its own tokio task so the dispatcher keeps serving other
//! chats while ffmpeg works. Outbound calls go through [`ChatSink`], which the
//! bot implements and tests replace with a recorder.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};
use teloxide::RequestError;
use tokio::task::JoinHandle;

use crate::core::error::{AppError, AppResult};
use crate::download::{Orchestrator, RequestId};
use crate::telegram::replies;
use crate::telegram::Bot;

/// The message that showed the resolution prompt and now shows progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Outbound side of a download job
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Replaces the text of the status message
    async fn edit_status(&self, status: StatusMessage, text: &str) -> Result<(), RequestError>;

    /// Uploads a local file as a video message
    async fn send_video(&self, chat_id: ChatId, path: &Path) -> Result<(), RequestError>;
}

#[async_trait]
impl ChatSink for Bot {
    async fn edit_status(&self, status: StatusMessage, text: &str) -> Result<(), RequestError> {
        self.edit_message_text(status.chat_id, status.message_id, text).await?;
        Ok(())
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path) -> Result<(), RequestError> {
        Requester::send_video(self, chat_id, InputFile::file(path.to_path_buf())).await?;
        Ok(())
    }
}

/// One accepted button press
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub id: RequestId,
    pub status: StatusMessage,
    pub url: String,
    pub resolution: String,
}

impl DownloadJob {
    pub fn new(status: StatusMessage, url: impl Into<String>, resolution: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(status.chat_id.0),
            status,
            url: url.into(),
            resolution: resolution.into(),
        }
    }
}

/// Runs a job to completion: download, report, send, clean up.
///
/// Any failure is shown to the user by editing the status message; the error
/// is also returned for logging.
pub async fn run_download_job(orchestrator: &Orchestrator, sink: &dyn ChatSink, job: &DownloadJob) -> AppResult<()> {
    log::info!(
        "[{}] Downloading video from URL: {} at resolution: {}",
        job.id,
        job.url,
        job.resolution
    );

    let outcome = deliver(orchestrator, sink, job).await;

    if let Err(e) = &outcome {
        log::error!("[{}] An error occurred ({}): {}", job.id, e.kind(), e);
        if let Err(edit_err) = sink.edit_status(job.status, &replies::error_text(e)).await {
            log::warn!("[{}] Failed to report error to chat: {}", job.id, edit_err);
        }
    }

    outcome
}

async fn deliver(orchestrator: &Orchestrator, sink: &dyn ChatSink, job: &DownloadJob) -> AppResult<()> {
    let result = orchestrator.fetch_and_mux(&job.id, &job.url, &job.resolution).await?;

    if let Err(e) = sink.edit_status(job.status, replies::DOWNLOAD_COMPLETE).await {
        log::warn!("[{}] Failed to update status message: {}", job.id, e);
    }

    let sent = sink.send_video(job.status.chat_id, &result.path).await;
    result.cleanup().await;
    sent.map_err(AppError::SendFailure)?;

    log::info!("[{}] Video sent successfully.", job.id);
    Ok(())
}

/// Spawns [`run_download_job`] on the runtime
pub fn spawn_download_job(
    orchestrator: Arc<Orchestrator>,
    sink: Arc<dyn ChatSink>,
    job: DownloadJob,
) -> JoinHandle<AppResult<()>> {
    tokio::spawn(async move { run_download_job(&orchestrator, sink.as_ref(), &job).await })
}
