use crate::{Command, Error, ExtractorBot, Result};
use teloxide::{requests::Requester, types::Message};
use tracing::info;
use xtract_core::render::NO_SESSION_MESSAGE;

/// Handle bot commands.
pub async fn handle_command(bot: ExtractorBot, msg: Message, cmd: Command) -> Result<()> {
    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    // Channel posts carry no sender; queries need a resolvable caller.
    if msg.from.is_none() {
        bot.bot.send_message(msg.chat.id, NO_SESSION_MESSAGE).await?;
        return Ok(());
    }

    match cmd {
        Command::Start => {
            info!("[@{username}] Command: /start");
            bot.bot
                .send_message(msg.chat.id, Command::welcome_text())
                .await?;
        }
        Command::Help => {
            info!("[@{username}] Command: /help");
            bot.bot
                .send_message(msg.chat.id, Command::help_text())
                .await?;
        }
        Command::Tags => {
            info!("[@{username}] Command: /tags");
            bot.bot
                .send_message(msg.chat.id, bot.extractor.list())
                .await?;
        }
        Command::Query(tag) => {
            info!("[@{username}] Command: /{tag}");
            let scope = msg.chat.id.0.to_string();
            bot.bot
                .send_message(msg.chat.id, bot.extractor.render(&scope, &tag))
                .await?;
        }
    }

    Ok(())
}

/// Handle any message (commands or regular text).
pub async fn handle_message(bot: ExtractorBot, msg: Message) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let text = msg.text().ok_or(Error::Config("No text content".into()))?;
    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    if let Some(cmd) = Command::parse_from_text(text, &bot.specs) {
        return handle_command(bot, msg, cmd).await;
    }

    if !bot.is_allowed(chat_id) {
        return Err(Error::Unauthorized(chat_id));
    }

    info!("[@{username}] Message: {text}");

    bot.bot
        .send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await?;

    // The chat id doubles as the conversation scope.
    let scope = chat_id.to_string();
    let response = bot
        .character
        .reply(&scope, text)
        .await
        .map_err(Error::Character)?;

    // Extracted tags are answered via their query commands, not inline.
    let visible = bot.extractor.strip_all(&response);
    let visible = visible.trim();
    let outgoing = if visible.is_empty() {
        response.as_str()
    } else {
        visible
    };

    bot.bot.send_message(msg.chat.id, outgoing).await?;

    Ok(())
}
