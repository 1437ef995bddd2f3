//! UI Builder module for creating keyboards and static messages

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

// Import localization
use crate::localization::t;

use crate::sink::Button;

/// Convert transport-neutral button rows into an inline keyboard
pub fn inline_keyboard(rows: &[Vec<Button>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.payload.clone()))
            .collect::<Vec<_>>()
    }))
}

/// One-time reply keyboard asking Telegram to share the user's phone number
pub fn contact_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(t("button-share-contact")).request(ButtonRequest::Contact),
    ]])
    .resize_keyboard()
    .one_time_keyboard()
}

/// Static /help text
pub fn help_message() -> String {
    [
        t("help-title"),
        t("help-hours"),
        t("help-zone"),
        t("help-time"),
        t("help-payment"),
        t("help-contact"),
    ]
    .join("\n")
}
