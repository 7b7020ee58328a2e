//! Per-request working directories.
//!
//! Every download gets its own directory named after the chat and a random
//! nonce, so two requests (a double tap, or two chats at once) never touch
//! each other's files. Normal paths remove the directory with
//! [`WorkDir::remove`] on tokio's blocking pool; dropping a `WorkDir` that was
//! never removed (a timed-out or cancelled future) deletes it synchronously.

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::download::error::DownloadError;

/// Identifies one download request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub chat_id: i64,
    pub nonce: Uuid,
}

impl RequestId {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            nonce: Uuid::new_v4(),
        }
    }

    /// Directory name under the working root
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.chat_id, self.nonce.simple())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

/// Owned working directory, deleted on drop
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Creates `<root>/<request dir>`. Fails if it already exists.
    pub async fn create(root: &Path, id: &RequestId) -> Result<Self, DownloadError> {
        fs_err::tokio::create_dir_all(root).await?;
        let path = root.join(id.dir_name());
        fs_err::tokio::create_dir(&path).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside this directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Deletes the directory and everything in it without blocking the runtime
    pub async fn remove(mut self) {
        // Empty path disarms Drop
        let path = std::mem::take(&mut self.path);
        match fs_err::tokio::remove_dir_all(&path).await {
            Ok(()) => log::debug!("Removed working directory {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove working directory: {}", e),
        }
    }

    /// Best-effort removal of one file inside the directory
    pub async fn remove_file(&self, path: &Path) {
        if let Err(e) = fs_err::tokio::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        // Blocking, but only a few files live here
        match fs_err::remove_dir_all(&self.path) {
            Ok(()) => log::debug!("Removed working directory {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove working directory: {}", e),
        }
    }
}
