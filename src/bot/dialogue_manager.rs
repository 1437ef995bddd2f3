//! Dialogue Manager module: applies wizard outcomes to the chat

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, KeyboardRemove, MessageId, User};
use teloxide::{ApiError, RequestError};
use tracing::{debug, error, warn};

// Import localization
use crate::localization::{t, t_args};

// Import core types
use crate::action::Action;
use crate::desk::{OrderDesk, Participant};
use crate::dialogue::OrderDialogue;
use crate::sink::MessageHandle;
use crate::wizard::{Outcome, View};

// Import UI builder functions
use super::ui_builder::{contact_request_keyboard, inline_keyboard};

/// Text for `answer_callback_query`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAnswer {
    pub text: String,
    pub alert: bool,
}

impl CallbackAnswer {
    pub fn toast(text: String) -> Self {
        Self { text, alert: false }
    }

    pub fn alert(text: String) -> Self {
        Self { text, alert: true }
    }
}

/// Build the participant behind a Telegram user in a chat
pub fn participant(user: Option<&User>, chat_id: ChatId) -> Participant {
    Participant {
        chat_id: chat_id.0,
        user_id: user.map(|u| u.id.0 as i64).unwrap_or(chat_id.0),
        display_name: user.map(|u| u.full_name()).unwrap_or_default(),
    }
}

/// Show a screen by editing `edit_target`, or as a new message when there is none
pub async fn show_view(bot: &Bot, chat_id: ChatId, edit_target: Option<MessageId>, view: &View) {
    let mut sent = false;

    if let Some(message_id) = edit_target {
        match bot
            .edit_message_text(chat_id, message_id, &view.text)
            .reply_markup(inline_keyboard(&view.keyboard))
            .await
        {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => sent = true,
            Err(e) => warn!(user_id = %chat_id, error = %e, "Failed to edit screen, sending a new one"),
        }
    }

    if !sent {
        if let Err(e) = bot
            .send_message(chat_id, &view.text)
            .reply_markup(inline_keyboard(&view.keyboard))
            .await
        {
            error!(user_id = %chat_id, error = %e, "Failed to send screen");
        }
    }

    if view.request_contact {
        if let Err(e) = bot
            .send_message(chat_id, t("contact-request-hint"))
            .reply_markup(contact_request_keyboard())
            .await
        {
            warn!(user_id = %chat_id, error = %e, "Failed to offer contact sharing");
        }
    }
}

/// Plain message that also drops any reply keyboard left on screen
pub async fn send_notice(bot: &Bot, chat_id: ChatId, text: String) {
    if let Err(e) = bot
        .send_message(chat_id, text)
        .reply_markup(KeyboardRemove::new())
        .await
    {
        error!(user_id = %chat_id, error = %e, "Failed to send notice");
    }
}

/// Apply the outcome of a free-text or contact message
pub async fn apply_message_outcome(bot: &Bot, chat_id: ChatId, outcome: Outcome) {
    match outcome {
        Outcome::Show { view, notice } => {
            if let Some(notice) = notice {
                send_notice(bot, chat_id, notice).await;
            }
            show_view(bot, chat_id, None, &view).await;
        }
        Outcome::Notice(text) => send_notice(bot, chat_id, text).await,
        Outcome::Fallback => send_notice(bot, chat_id, t("text-fallback")).await,
        Outcome::Keyboard(_) | Outcome::Confirm | Outcome::Ignored => {
            debug!(user_id = %chat_id, "Message left the session unchanged");
        }
    }
}

/// Run a button press through the wizard and show the result
pub async fn handle_wizard_action(
    bot: &Bot,
    q: &CallbackQuery,
    desk: &Arc<OrderDesk>,
    dialogue: &OrderDialogue,
    action: &Action,
) -> Result<Option<CallbackAnswer>> {
    let mut session = dialogue.get().await?.unwrap_or_default();
    let outcome = desk.wizard().handle_action(&mut session, action);

    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or_else(|| dialogue.chat_id());
    let pressed = q.message.as_ref().map(|msg| msg.id());

    let answer = match outcome {
        Outcome::Show { view, notice } => {
            // a restart from the tracking message must not overwrite it
            let target = if matches!(action, Action::Restart) { None } else { pressed };
            show_view(bot, chat_id, target, &view).await;
            notice.map(CallbackAnswer::toast)
        }
        Outcome::Keyboard(view) => {
            if let Some(message_id) = pressed {
                match bot
                    .edit_message_reply_markup(chat_id, message_id)
                    .reply_markup(inline_keyboard(&view.keyboard))
                    .await
                {
                    Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => {}
                    Err(e) => warn!(user_id = %chat_id, error = %e, "Failed to update buttons"),
                }
            }
            None
        }
        Outcome::Notice(text) => Some(CallbackAnswer::alert(text)),
        Outcome::Confirm => {
            let customer = participant(Some(&q.from), chat_id);
            let summary_message = pressed.map(|id| MessageHandle::new(chat_id.0, id.0));
            match desk.place_order(&mut session, &customer, summary_message).await {
                Ok(record) => Some(CallbackAnswer::toast(t_args(
                    "order-placed",
                    &[("order", &record.order_number)],
                ))),
                Err(e) => {
                    warn!(user_id = %chat_id, error = %e, "Order was not placed");
                    Some(CallbackAnswer::alert(e.user_message()))
                }
            }
        }
        Outcome::Fallback | Outcome::Ignored => {
            debug!(user_id = %chat_id, action = ?action, "Dropped stale button press");
            None
        }
    };

    dialogue.update(session).await?;
    Ok(answer)
}
