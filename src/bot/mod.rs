//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles commands, free text and shared contacts
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Converts screens into Telegram keyboards
//! - `dialogue_manager`: Applies wizard outcomes to the chat
//! - `telegram_sink`: Outbound chat sink used by the order desk

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod telegram_sink;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;
pub use telegram_sink::TelegramSink;
