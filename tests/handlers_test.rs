//! Conversation flow tests for the bot-independent handler logic

use pretty_assertions::assert_eq;
use teloxide::types::{ChatId, InlineKeyboardButtonKind};
use tubemux::telegram::handlers::{prepare_download, text_reply};
use tubemux::telegram::replies;
use tubemux::{AppError, ConversationState};

#[test]
fn test_greeting_uses_first_name() {
    let text = replies::greeting("Alice");
    assert!(text.starts_with("Welcome Alice,"));
    assert!(text.contains("YouTube"));
}

#[test]
fn test_link_then_button_flow() {
    let state = ConversationState::new();
    let chat = ChatId(55);

    let reply = text_reply(&state, chat, "https://www.youtube.com/watch?v=abc");
    let keyboard = reply.keyboard.expect("supported link gets a keyboard");
    assert_eq!(keyboard.inline_keyboard.len(), 1);

    let button = &keyboard.inline_keyboard[0][0];
    assert_eq!(button.text, "HD QUALITY");
    let InlineKeyboardButtonKind::CallbackData(payload) = &button.kind else {
        panic!("expected callback button");
    };

    let url = prepare_download(&state, chat, payload).unwrap();
    assert_eq!(url, "https://www.youtube.com/watch?v=abc");
    assert_eq!(replies::downloading(payload), "Please wait: Downloading 720p format");
}

#[test]
fn test_last_link_wins() {
    let state = ConversationState::new();
    let chat = ChatId(55);

    text_reply(&state, chat, "https://youtu.be/first");
    text_reply(&state, chat, "https://youtu.be/second");

    assert_eq!(prepare_download(&state, chat, "720p").unwrap(), "https://youtu.be/second");
}

#[test]
fn test_unsupported_link_keeps_previous_link() {
    let state = ConversationState::new();
    let chat = ChatId(55);

    text_reply(&state, chat, "https://youtu.be/first");
    let reply = text_reply(&state, chat, "hello there");

    assert_eq!(reply.text, "Please send me YouTube link only.");
    assert!(reply.keyboard.is_none());
    assert_eq!(prepare_download(&state, chat, "720p").unwrap(), "https://youtu.be/first");
}

#[test]
fn test_button_without_link_is_an_error() {
    let state = ConversationState::new();
    let err = prepare_download(&state, ChatId(1), "720p").unwrap_err();

    assert!(matches!(err, AppError::NoPendingRequest));
    assert!(replies::error_text(&err).starts_with("An error occurred: No pending request"));
}

#[test]
fn test_links_are_per_chat() {
    let state = ConversationState::new();

    text_reply(&state, ChatId(1), "https://youtu.be/one");
    text_reply(&state, ChatId(2), "https://youtu.be/two");

    assert_eq!(prepare_download(&state, ChatId(1), "720p").unwrap(), "https://youtu.be/one");
    assert_eq!(prepare_download(&state, ChatId(2), "720p").unwrap(), "https://youtu.be/two");
    assert_eq!(state.len(), 2);
}
