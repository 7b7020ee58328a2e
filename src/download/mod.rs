//! Download management: stream resolution, fetching, muxing and cleanup

pub mod error;
pub mod muxer;
pub mod orchestrator;
pub mod stream;
pub mod workdir;
pub mod ytdlp;

// Re-exports for convenience
pub use error::DownloadError;
pub use muxer::{FfmpegMuxer, Muxer};
pub use orchestrator::{DownloadResult, Orchestrator, OrchestratorConfig};
pub use stream::{StreamDescriptor, StreamHandle, StreamKind, StreamResolver};
pub use workdir::{RequestId, WorkDir};
pub use ytdlp::YtDlpResolver;
