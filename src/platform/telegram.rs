use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::dispatch::CommandDispatcher;
use crate::platform::IncomingMessage;

/// Command menu shown by Telegram clients. Parsing is done by the dispatcher.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum MenuCommand {
    #[command(description = "say hello")]
    Start,
    #[command(description = "list commands")]
    Help,
    #[command(description = "check whether a product is in stock")]
    Check,
}

/// Stay under Telegram's 4096 char message limit
const MAX_MESSAGE_LEN: usize = 4000;

/// Cut `text` to at most `max_len` bytes on a char boundary.
fn clamp_message(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }

    // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Run the Telegram bot platform
pub async fn run(dispatcher: Arc<CommandDispatcher>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    let me = bot
        .get_me()
        .await
        .context("Failed to fetch bot identity from Telegram")?;
    info!("Running as @{}", me.user.username.as_deref().unwrap_or("<no username>"));

    if let Err(e) = bot.set_my_commands(MenuCommand::bot_commands()).await {
        warn!("Failed to register command menu: {}", e);
    }

    let handler = Update::filter_message().endpoint(handle_message);

    // Updates from one chat are handled in order; separate chats run concurrently
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher, me])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    dispatcher: Arc<CommandDispatcher>,
) -> ResponseResult<()> {
    let user = match msg.from.as_ref() {
        Some(user) => user,
        None => return Ok(()),
    };

    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    let incoming = IncomingMessage {
        platform: "telegram".to_string(),
        user_id: user.id.0.to_string(),
        chat_id: msg.chat.id.0.to_string(),
        user_name: user.first_name.clone(),
        bot_username: me.user.username.clone(),
        text,
    };

    info!(
        "{} message from {} ({}) in chat {}: {}",
        incoming.platform, incoming.user_name, incoming.user_id, incoming.chat_id, incoming.text
    );

    if let Some(reply) = dispatcher.handle(&incoming).await {
        if reply.len() > MAX_MESSAGE_LEN {
            warn!("Reply of {} bytes truncated for chat {}", reply.len(), incoming.chat_id);
        }
        bot.send_message(msg.chat.id, clamp_message(&reply, MAX_MESSAGE_LEN))
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_unchanged() {
        assert_eq!(
            clamp_message("Eden 101 is in Stock!", MAX_MESSAGE_LEN),
            "Eden 101 is in Stock!"
        );
    }

    #[test]
    fn test_long_message_clamped() {
        let text = "a".repeat(5000);
        assert_eq!(clamp_message(&text, MAX_MESSAGE_LEN).len(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_clamp_respects_char_boundary() {
        // 'é' is two bytes, so byte 5 falls inside a char
        assert_eq!(clamp_message("ééééé", 5), "éé");
    }
}
