//! # Configuration Module
//!
//! Runtime settings read from the environment (optionally seeded from a
//! `.env` file by `main`).

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use crate::relay::RelayMode;

pub const DEFAULT_ORDER_SEQ_PATH: &str = "order_seq.json";

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Chat id of the single operator
    pub operator_chat_id: i64,
    /// JSON file holding the daily order sequence
    pub order_seq_path: PathBuf,
    /// URL or local path of the image sent when an order is done
    pub done_media: Option<String>,
    /// Whether a relay ends after one message or on an explicit end-chat
    pub relay_mode: RelayMode,
}

impl BotConfig {
    /// Load the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = non_empty("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let operator_chat_id = non_empty("OPERATOR_CHAT_ID")
            .context("OPERATOR_CHAT_ID must be set")?
            .parse::<i64>()
            .context("OPERATOR_CHAT_ID must be a numeric chat id")?;

        let order_seq_path = non_empty("ORDER_SEQ_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ORDER_SEQ_PATH));

        let relay_mode = match non_empty("RELAY_MODE") {
            Some(value) => RelayMode::from_slug(&value)
                .ok_or_else(|| anyhow!("RELAY_MODE must be 'single' or 'toggled', got '{value}'"))?,
            None => RelayMode::default(),
        };

        Ok(Self {
            bot_token,
            operator_chat_id,
            order_seq_path,
            done_media: non_empty("DONE_MEDIA"),
            relay_mode,
        })
    }
}
