//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, warn};

// Import localization
use crate::localization::{t, t_args};

// Import core types
use crate::action::Action;
use crate::desk::OrderDesk;
use crate::dialogue::OrderDialogue;
use crate::relay::Party;
use crate::sink::MessageHandle;

use super::dialogue_manager::{handle_wizard_action, CallbackAnswer};

async fn open_relay(desk: &OrderDesk, q: &CallbackQuery, actor: i64, party: Party, order: &str) -> CallbackAnswer {
    if let Err(e) = desk.begin_relay(actor, party, order) {
        return CallbackAnswer::alert(e.user_message());
    }

    if let Some(message) = &q.message {
        let pressed = MessageHandle::new(message.chat().id.0, message.id().0);
        let _ = desk.refresh_controls(party, order, pressed).await;
    }

    match party {
        Party::Operator => CallbackAnswer::toast(t("relay-prompt-operator")),
        Party::Customer => CallbackAnswer::toast(t("relay-prompt-customer")),
    }
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    desk: Arc<OrderDesk>,
    dialogue: OrderDialogue,
) -> Result<()> {
    let actor = q.from.id.0 as i64;
    let action = Action::parse(q.data.as_deref().unwrap_or(""));
    debug!(user_id = actor, action = ?action, "Received callback query from user");

    let answer = match &action {
        Action::SetStatus { order, status } => match desk.change_status(actor, order, *status).await {
            Ok(report) => Some(CallbackAnswer::toast(t_args(
                "operator-status-set",
                &[
                    ("order", &report.record.order_number),
                    ("status", &t(report.record.status.label_key())),
                ],
            ))),
            Err(e) => {
                warn!(user_id = actor, order = %order, error = %e, "Status change rejected");
                Some(CallbackAnswer::alert(e.user_message()))
            }
        },
        Action::MessageCustomer(order) => Some(open_relay(&desk, &q, actor, Party::Operator, order).await),
        Action::MessageOperator(order) => Some(open_relay(&desk, &q, actor, Party::Customer, order).await),
        Action::EndChat(order) => match desk.end_relay(actor, order).await {
            Ok(_) => Some(CallbackAnswer::toast(t("relay-ended"))),
            Err(e) => Some(CallbackAnswer::alert(e.user_message())),
        },
        Action::Unknown(raw) => {
            debug!(user_id = actor, data = %raw, "Ignoring unknown callback payload");
            None
        }
        _ => handle_wizard_action(&bot, &q, &desk, &dialogue, &action).await?,
    };

    // Answer the callback query to remove the loading state
    let mut request = bot.answer_callback_query(q.id.clone());
    if let Some(answer) = answer {
        request = request.text(answer.text).show_alert(answer.alert);
    }
    if let Err(e) = request.await {
        warn!(user_id = actor, error = %e, "Failed to answer callback query");
    }

    Ok(())
}
