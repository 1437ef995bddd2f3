//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Contact;
use tracing::debug;

// Import localization
use crate::localization::t;

// Import core types
use crate::desk::OrderDesk;
use crate::dialogue::{OrderDialogue, Session};
use crate::relay::Party;

use super::dialogue_manager::{apply_message_outcome, participant, send_notice, show_view};
use super::ui_builder::help_message;

/// Command word of a message, without the `@BotName` suffix group chats add
fn command_name(text: &str) -> Option<&str> {
    let word = text.split_whitespace().next()?;
    if !word.starts_with('/') {
        return None;
    }
    Some(word.split_once('@').map_or(word, |(command, _)| command))
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    desk: &OrderDesk,
    dialogue: OrderDialogue,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let sender = participant(msg.from.as_ref(), chat_id);
    debug!(user_id = %chat_id, message_length = text.len(), "Received text message from user");

    let command = command_name(text);

    // Handle /start command
    if command == Some("/start") {
        let mut session = Session::default();
        let view = desk.wizard().start(&mut session);
        show_view(bot, chat_id, None, &view).await;
        dialogue.update(session).await?;
        return Ok(());
    }

    // Handle /help command
    if command == Some("/help") {
        bot.send_message(chat_id, help_message()).await?;
        return Ok(());
    }

    // An open relay takes the text before the wizard does
    if let Some(report) = desk.relay_text(&sender, text).await {
        let ack = match (&report.delivery, report.from) {
            (Ok(_), Party::Operator) => t("relay-sent-to-customer"),
            (Ok(_), Party::Customer) => t("relay-sent-to-operator"),
            (Err(_), _) => t("relay-failed"),
        };
        bot.send_message(chat_id, ack).await?;
        return Ok(());
    }

    if text.starts_with('/') {
        send_notice(bot, chat_id, t("text-fallback")).await;
        return Ok(());
    }

    let mut session = dialogue.get().await?.unwrap_or_default();
    let outcome = desk.wizard().handle_text(&mut session, text);
    apply_message_outcome(bot, chat_id, outcome).await;
    dialogue.update(session).await?;

    Ok(())
}

async fn handle_contact_message(
    bot: &Bot,
    msg: &Message,
    contact: &Contact,
    desk: &OrderDesk,
    dialogue: OrderDialogue,
) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(user_id = %chat_id, "Received shared contact from user");

    let sender_id = msg.from.as_ref().map(|user| user.id);
    if contact.user_id.is_some() && contact.user_id != sender_id {
        send_notice(bot, chat_id, t("contact-not-yours")).await;
        return Ok(());
    }

    let mut session = dialogue.get().await?.unwrap_or_default();
    let outcome = desk.wizard().handle_contact(&mut session, &contact.phone_number);
    apply_message_outcome(bot, chat_id, outcome).await;
    dialogue.update(session).await?;

    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");
    bot.send_message(msg.chat.id, t("text-fallback")).await?;
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    desk: Arc<OrderDesk>,
    dialogue: OrderDialogue,
) -> Result<()> {
    if let Some(contact) = msg.contact() {
        handle_contact_message(&bot, &msg, contact, &desk, dialogue).await?;
    } else if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, text, &desk, dialogue).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
