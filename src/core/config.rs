use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Port the webhook listener binds to on 0.0.0.0
/// Read from PORT environment variable
/// Default: 8443
pub static PORT: Lazy<u16> = Lazy::new(|| {
    env::var("PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(8443)
});

/// Public base URL Telegram should deliver webhook updates to.
/// The bot token is appended as the path, see [`webhook_endpoint`].
pub static WEBHOOK_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty()));

/// Optional custom Bot API server (e.g. a local telegram-bot-api instance)
pub static BOT_API_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("BOT_API_URL").ok().filter(|s| !s.trim().is_empty()));

/// yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// ffmpeg binary path
/// Read from FFMPEG_BIN environment variable or defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> =
    Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Root directory for per-request working directories.
/// Read from WORK_DIR environment variable, supports tilde (~) expansion.
/// Defaults to `<system temp>/tubemux`.
pub static WORK_DIR: Lazy<PathBuf> = Lazy::new(|| match env::var("WORK_DIR") {
    Ok(dir) if !dir.trim().is_empty() => PathBuf::from(shellexpand::tilde(dir.trim()).into_owned()),
    _ => env::temp_dir().join("tubemux"),
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: tubemux.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "tubemux.log".to_string()));

/// Upper bound for one fetch + mux run, in seconds
/// Read from DOWNLOAD_TIMEOUT_SECS environment variable
pub static DOWNLOAD_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
    env::var("DOWNLOAD_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(download::DEFAULT_TIMEOUT_SECS)
});

/// Full webhook URL: the base URL with the bot token appended as the path.
///
/// The token doubles as a shared secret, only Telegram knows the path.
pub fn webhook_endpoint(base: &str, token: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), token)
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for uploading big videos
    pub const REQUEST_TIMEOUT_SECS: u64 = 900;

    /// Timeout for establishing connections to the media CDN (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

/// Download configuration
pub mod download {
    use super::Duration;

    /// Default upper bound for fetch + mux (in seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

    /// Timeout for `yt-dlp -J` format listing (in seconds)
    pub const RESOLVE_TIMEOUT_SECS: u64 = 120;

    /// Container the video-only stream must have
    pub const VIDEO_MIME: &str = "video/mp4";

    /// Container the audio-only stream must have
    pub const AUDIO_MIME: &str = "audio/mp4";

    /// Codec the audio track is re-encoded into
    pub const AUDIO_CODEC: &str = "aac";

    /// Resolve timeout duration
    pub fn resolve_timeout() -> Duration {
        Duration::from_secs(RESOLVE_TIMEOUT_SECS)
    }
}

/// Resolution presets offered as inline buttons
pub mod preset {
    /// A button label and the resolution its callback payload carries
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResolutionPreset {
        pub label: &'static str,
        pub resolution: &'static str,
    }

    /// Buttons shown under the "Select video format" prompt, one per row
    pub const RESOLUTION_PRESETS: &[ResolutionPreset] = &[ResolutionPreset {
        label: "HD QUALITY",
        resolution: "720p",
    }];

    /// Resolution used by the CLI when none is given
    pub const DEFAULT_RESOLUTION: &str = "720p";

    /// Looks up a preset by its callback payload
    pub fn find(resolution: &str) -> Option<&'static ResolutionPreset> {
        RESOLUTION_PRESETS.iter().find(|p| p.resolution == resolution)
    }
}
