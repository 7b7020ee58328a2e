//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_help_command, handle_start_command};
use super::messages::{handle_resolution_callback, handle_text_message};
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Branch order matters: commands first, then plain text (anything not
/// starting with `/`), then inline button callbacks. Unknown commands fall
/// through every branch and are ignored.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps.clone()))
        .branch(callback_handler(deps))
}

/// Handler for bot commands (/start, /help)
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

            match cmd {
                Command::Start => handle_start_command(&bot, &msg).await?,
                Command::Help => handle_help_command(&bot, &msg).await?,
            }
            Ok::<(), HandlerError>(())
        },
    ))
}

/// Handler for regular text messages (links)
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(|text| !text.starts_with('/')))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(e) = handle_text_message(&bot, &msg, &deps).await {
                    log::error!("Error handling message in chat {} ({}): {}", msg.chat.id, e.kind(), e);
                }
                Ok::<(), HandlerError>(())
            }
        })
}

/// Handler for callback queries (resolution buttons)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            if let Err(e) = handle_resolution_callback(bot, q, deps).await {
                log::error!("Error handling button press ({}): {}", e.kind(), e);
            }
            Ok::<(), HandlerError>(())
        }
    })
}
