//! Texts and keyboards the bot sends

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::config::preset::RESOLUTION_PRESETS;
use crate::core::error::AppError;

pub const SELECT_FORMAT: &str = "Select video format:";
pub const DOWNLOAD_COMPLETE: &str = "Download completed. Sending the file...";

/// Reply to /start
pub fn greeting(first_name: &str) -> String {
    format!(
        "Welcome {}, Send me YouTube Video url, I will give video in your preferred format.",
        first_name
    )
}

/// Reply to /help
pub fn help_text() -> String {
    "Send me a YouTube link (youtube.com or youtu.be), pick a quality, and I will send the video back.".to_string()
}

/// Progress text shown in place of the resolution prompt
pub fn downloading(resolution: &str) -> String {
    format!("Please wait: Downloading {} format", resolution)
}

/// Error text shown to the user, in place of the prompt
pub fn error_text(err: &AppError) -> String {
    format!("An error occurred: {}", err)
}

/// One button per preset, the callback payload is the resolution string
pub fn resolution_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        RESOLUTION_PRESETS
            .iter()
            .map(|preset| vec![InlineKeyboardButton::callback(preset.label, preset.resolution)]),
    )
}

/// A text reply with an optional inline keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_greeting_mentions_name() {
        assert!(greeting("Alice").starts_with("Welcome Alice,"));
    }

    #[test]
    fn test_keyboard_has_one_row_per_preset() {
        let keyboard = resolution_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), RESOLUTION_PRESETS.len());

        let button = &keyboard.inline_keyboard[0][0];
        assert_eq!(button.text, "HD QUALITY");
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "720p"),
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_error_text_wraps_display() {
        assert_eq!(
            error_text(&AppError::NoPendingRequest),
            "An error occurred: No pending request: send me a YouTube link first."
        );
    }

    #[test]
    fn test_downloading_text() {
        assert_eq!(downloading("720p"), "Please wait: Downloading 720p format");
    }
}
