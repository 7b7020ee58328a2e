//! Command handler implementations (/start, /help)

use teloxide::prelude::*;
use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

use super::types::display_name;
use crate::core::error::AppResult;
use crate::telegram::bot::Command;
use crate::telegram::replies;
use crate::telegram::Bot;

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> AppResult<()> {
    let first_name = display_name(msg);
    bot.send_message(msg.chat.id, replies::greeting(&first_name)).await?;
    log::info!("User {} started the bot.", first_name);
    Ok(())
}

/// Handle /help command
pub(super) async fn handle_help_command(bot: &Bot, msg: &Message) -> AppResult<()> {
    let text = format!("{}\n\n{}", replies::help_text(), Command::descriptions());
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
