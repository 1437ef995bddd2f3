//! Telegram implementation of the order desk's chat sink

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};

use crate::sink::{Button, ChatSink, Delivery, DeliveryError, MessageHandle};

use super::ui_builder::inline_keyboard;

#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn delivery_error(err: teloxide::RequestError) -> DeliveryError {
    DeliveryError::new(err.to_string())
}

#[async_trait]
impl ChatSink for TelegramSink {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: &[Vec<Button>]) -> Delivery {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if !keyboard.is_empty() {
            request = request.reply_markup(inline_keyboard(keyboard));
        }
        request
            .await
            .map(|message| MessageHandle::new(chat_id, message.id.0))
            .map_err(delivery_error)
    }

    async fn edit_text(&self, target: MessageHandle, text: &str, keyboard: &[Vec<Button>]) -> Delivery {
        self.bot
            .edit_message_text(ChatId(target.chat_id), MessageId(target.message_id), text)
            .reply_markup(inline_keyboard(keyboard))
            .await
            .map(|message| MessageHandle::new(target.chat_id, message.id.0))
            .map_err(delivery_error)
    }

    async fn edit_keyboard(&self, target: MessageHandle, keyboard: &[Vec<Button>]) -> Delivery {
        self.bot
            .edit_message_reply_markup(ChatId(target.chat_id), MessageId(target.message_id))
            .reply_markup(inline_keyboard(keyboard))
            .await
            .map(|message| MessageHandle::new(target.chat_id, message.id.0))
            .map_err(delivery_error)
    }

    async fn send_media(&self, chat_id: i64, media: &str, caption: Option<&str>) -> Delivery {
        let file = if media.starts_with("http://") || media.starts_with("https://") {
            let url = reqwest::Url::parse(media)
                .map_err(|e| DeliveryError::new(format!("invalid media url {media}: {e}")))?;
            InputFile::url(url)
        } else {
            InputFile::file(media)
        };

        let mut request = self.bot.send_photo(ChatId(chat_id), file);
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        request
            .await
            .map(|message| MessageHandle::new(chat_id, message.id.0))
            .map_err(delivery_error)
    }
}
