//! Free-text messages and resolution button presses

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatId, Message};

use super::types::HandlerDeps;
use crate::core::config::preset;
use crate::core::error::{AppError, AppResult};
use crate::core::validation::is_supported_link;
use crate::telegram::delivery::{spawn_download_job, ChatSink, DownloadJob, StatusMessage};
use crate::telegram::replies::{self, Reply};
use crate::telegram::state::ConversationState;
use crate::telegram::Bot;

/// Decides the reply to a text message, storing the link when it is supported.
///
/// Unsupported text never gets the resolution keyboard and leaves the state untouched.
pub fn text_reply(state: &ConversationState, chat_id: ChatId, text: &str) -> Reply {
    if !is_supported_link(text) {
        return Reply::text(AppError::UnsupportedLink.to_string());
    }

    state.set_pending_url(chat_id, text.trim());
    Reply::with_keyboard(replies::SELECT_FORMAT, replies::resolution_keyboard())
}

/// Checks a button payload and returns the chat's pending link
pub fn prepare_download(state: &ConversationState, chat_id: ChatId, resolution: &str) -> AppResult<String> {
    if preset::find(resolution).is_none() {
        return Err(AppError::UnknownPreset(resolution.to_string()));
    }
    state.require_pending_url(chat_id)
}

pub(super) async fn handle_text_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    log::info!("Received URL: {}", text);

    let reply = text_reply(&deps.state, msg.chat.id, text);
    if reply.keyboard.is_none() {
        log::warn!("Invalid URL received from chat {}", msg.chat.id);
    }

    let mut request = bot.send_message(msg.chat.id, reply.text);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

pub(super) async fn handle_resolution_callback(
    bot: Bot,
    q: CallbackQuery,
    deps: HandlerDeps,
) -> AppResult<()> {
    // Stops the loading indicator on the button
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message.as_ref() else {
        log::warn!("Callback query {:?} has no message attached", q.id);
        return Ok(());
    };
    let status = StatusMessage {
        chat_id: message.chat().id,
        message_id: message.id(),
    };
    let resolution = q.data.clone().unwrap_or_default();

    let url = match prepare_download(&deps.state, status.chat_id, &resolution) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Rejected button press in chat {}: {}", status.chat_id, e);
            bot.edit_message_text(status.chat_id, status.message_id, replies::error_text(&e))
                .await?;
            return Ok(());
        }
    };

    bot.edit_message_text(status.chat_id, status.message_id, replies::downloading(&resolution))
        .await?;

    let job = DownloadJob::new(status, url, resolution);
    let sink: Arc<dyn ChatSink> = Arc::new(bot);
    spawn_download_job(Arc::clone(&deps.orchestrator), sink, job);
    Ok(())
}
