use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shawarma_bot::bot::{callback_handler, message_handler, TelegramSink};
use shawarma_bot::catalog::Catalog;
use shawarma_bot::config::BotConfig;
use shawarma_bot::desk::{DeskSettings, OrderDesk};
use shawarma_bot::dialogue::Session;
use shawarma_bot::order_seq::FileOrderCounter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Shawarma ordering bot");

    let config = BotConfig::from_env()?;
    info!(
        operator = config.operator_chat_id,
        order_seq_path = %config.order_seq_path.display(),
        relay_mode = ?config.relay_mode,
        "Configuration loaded"
    );

    // Initialize the bot
    let bot = Bot::new(&config.bot_token);

    let desk = Arc::new(OrderDesk::new(
        DeskSettings {
            operator_id: config.operator_chat_id,
            done_media: config.done_media.clone(),
        },
        Arc::new(Catalog::standard()),
        Arc::new(FileOrderCounter::open(&config.order_seq_path)),
        config.relay_mode,
        Arc::new(TelegramSink::new(bot.clone())),
    ));

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<Session>, Session>()
                .endpoint(message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<Session>, Session>()
                .endpoint(callback_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<Session>::new(), desk])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
