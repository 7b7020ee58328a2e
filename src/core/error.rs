use thiserror::Error;

use crate::download::error::DownloadError;

/// Centralized error types for the application
///
/// Every failure a chat can run into maps to one variant, so handlers can
/// pick a user-facing message per kind instead of a generic catch-all.
#[derive(Error, Debug)]
pub enum AppError {
    /// The message text is not a link the bot can handle
    #[error("Please send me YouTube link only.")]
    UnsupportedLink,

    /// A resolution button was pressed but no link is stored for the chat
    #[error("No pending request: send me a YouTube link first.")]
    NoPendingRequest,

    /// Callback payload does not match any offered resolution
    #[error("Unknown resolution: {0}")]
    UnknownPreset(String),

    /// Resolve / fetch / mux failures
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Delivering the finished file to the chat failed
    #[error("Failed to send the video: {0}")]
    SendFailure(#[source] teloxide::RequestError),

    /// Telegram API errors outside of video delivery (replies, edits, callback answers)
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

impl AppError {
    /// Short tag for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::UnsupportedLink => "unsupported_link",
            AppError::NoPendingRequest => "no_pending_request",
            AppError::UnknownPreset(_) => "unknown_preset",
            AppError::Download(e) => e.kind(),
            AppError::SendFailure(_) => "send_failure",
            AppError::Telegram(_) => "telegram",
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::ApiError;

    #[test]
    fn test_display_is_user_facing() {
        assert_eq!(AppError::UnsupportedLink.to_string(), "Please send me YouTube link only.");
        assert!(AppError::NoPendingRequest.to_string().contains("send me a YouTube link"));
    }

    #[test]
    fn test_download_error_is_transparent() {
        let err: AppError = DownloadError::StreamUnavailable {
            resolution: "720p".into(),
            missing: "audio",
        }
        .into();
        assert_eq!(err.kind(), "stream_unavailable");
        assert!(err.to_string().contains("720p"));
    }

    #[test]
    fn test_request_error_outside_delivery_is_telegram() {
        let err: AppError = teloxide::RequestError::Api(ApiError::MessageNotModified).into();
        assert_eq!(err.kind(), "telegram");
        assert!(err.to_string().starts_with("Telegram error"));
    }

    #[test]
    fn test_send_failure_kind() {
        let err = AppError::SendFailure(teloxide::RequestError::Api(ApiError::BotBlocked));
        assert_eq!(err.kind(), "send_failure");
        assert!(err.to_string().starts_with("Failed to send the video"));
    }
}
