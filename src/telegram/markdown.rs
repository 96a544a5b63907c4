//! Delivery of rendered menus as MarkdownV2 messages.

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::RequestError;

use crate::core::utils::markdown_v2_to_plain;
use crate::telegram::menu::RenderedMenu;

fn is_markdown_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

fn is_not_modified_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("message is not modified")
}

/// Send a menu as a new message; on a MarkdownV2 parse error retry with the
/// markup stripped.
pub async fn send_menu(bot: &Bot, chat_id: ChatId, menu: &RenderedMenu) -> ResponseResult<Message> {
    let result = bot
        .send_message(chat_id, menu.text.clone())
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(menu.keyboard())
        .await;

    match result {
        Ok(msg) => Ok(msg),
        Err(e) if is_markdown_parse_error(&e) => {
            log::warn!("MarkdownV2 rejected for chat {}, resending as plain text: {}", chat_id, e);
            bot.send_message(chat_id, markdown_v2_to_plain(&menu.text))
                .reply_markup(menu.keyboard())
                .await
        }
        Err(e) => Err(e),
    }
}

/// Replace the content of the message a button was pressed on.
///
/// Falls back to sending a new message when the old one cannot be edited
/// (too old, deleted, or a media message). Editing to identical content is
/// treated as success.
pub async fn edit_menu(bot: &Bot, chat_id: ChatId, message_id: MessageId, menu: &RenderedMenu) -> ResponseResult<()> {
    let result = bot
        .edit_message_text(chat_id, message_id, menu.text.clone())
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(menu.keyboard())
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_not_modified_error(&e) => Ok(()),
        Err(e) => {
            log::debug!("Cannot edit message {} in chat {}: {}, sending new", message_id.0, chat_id, e);
            send_menu(bot, chat_id, menu).await?;
            Ok(())
        }
    }
}
