//! Mapping of transport-neutral replies onto Telegram requests.

use souschef_core::error::SousChefError;
use souschef_core::render::{Menu, Reply, TextFormat};
use teloxide::payloads::{
    EditMessageReplyMarkupSetters, EditMessageTextSetters, SendMessageSetters,
};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};

pub fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.payload.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Telegram could not parse the MarkdownV2 entities. Other API errors
/// (message not modified, bot blocked, ...) are not fixed by plain text.
fn rejected(err: &RequestError) -> bool {
    match err {
        RequestError::Api(ApiError::CantParseEntities(_)) => true,
        RequestError::Api(ApiError::Unknown(msg)) => msg.contains("can't parse entities"),
        _ => false,
    }
}

async fn send(bot: &Bot, chat: ChatId, reply: &Reply) -> ResponseResult<()> {
    let mut request = bot.send_message(chat, reply.text.clone());
    if let Some(menu) = &reply.menu {
        request = request.reply_markup(keyboard(menu));
    }
    if reply.format == TextFormat::MarkdownV2 {
        request = request.parse_mode(ParseMode::MarkdownV2);
    }
    request.await?;
    Ok(())
}

async fn edit(bot: &Bot, chat: ChatId, message: MessageId, reply: &Reply) -> ResponseResult<()> {
    let mut request = bot.edit_message_text(chat, message, reply.text.clone());
    if let Some(menu) = &reply.menu {
        request = request.reply_markup(keyboard(menu));
    }
    if reply.format == TextFormat::MarkdownV2 {
        request = request.parse_mode(ParseMode::MarkdownV2);
    }
    request.await?;
    Ok(())
}

/// Send a reply; a rejected MarkdownV2 message is resent as plain text with
/// the same keyboard.
pub async fn send_reply(bot: &Bot, chat: ChatId, reply: &Reply) -> ResponseResult<()> {
    match send(bot, chat, reply).await {
        Err(e) if reply.format == TextFormat::MarkdownV2 && rejected(&e) => {
            let err = SousChefError::Rendering(e.to_string());
            tracing::warn!(chat = chat.0, "{err}; resending as plain text");
            send(bot, chat, &reply.plain_fallback()).await
        }
        other => other,
    }
}

/// Replace the text (and keyboard) of an existing message, with the same
/// plain-text fallback as [`send_reply`].
pub async fn edit_reply(
    bot: &Bot,
    chat: ChatId,
    message: MessageId,
    reply: &Reply,
) -> ResponseResult<()> {
    match edit(bot, chat, message, reply).await {
        Err(e) if reply.format == TextFormat::MarkdownV2 && rejected(&e) => {
            let err = SousChefError::Rendering(e.to_string());
            tracing::warn!(chat = chat.0, "{err}; editing as plain text");
            edit(bot, chat, message, &reply.plain_fallback()).await
        }
        other => other,
    }
}

pub async fn edit_menu(
    bot: &Bot,
    chat: ChatId,
    message: MessageId,
    menu: &Menu,
) -> ResponseResult<()> {
    bot.edit_message_reply_markup(chat, message)
        .reply_markup(keyboard(menu))
        .await?;
    Ok(())
}
