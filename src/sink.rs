//! # Chat Sink Module
//!
//! Outbound side of the chat transport as seen by the order desk. Every call
//! returns its own [`Delivery`] so callers decide what a failure means.

use async_trait::async_trait;

/// Opaque reference to a sent message, used for later edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i32,
}

impl MessageHandle {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self { chat_id, message_id }
    }
}

/// Inline button: a label and the callback payload it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Rows of inline buttons
pub type Keyboard = Vec<Vec<Button>>;

/// A failed outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryError {
    pub reason: String,
}

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Delivery failed: {}", self.reason)
    }
}

impl std::error::Error for DeliveryError {}

/// Outcome of a single best-effort outbound call
pub type Delivery = Result<MessageHandle, DeliveryError>;

#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: &[Vec<Button>]) -> Delivery;

    async fn edit_text(&self, target: MessageHandle, text: &str, keyboard: &[Vec<Button>]) -> Delivery;

    async fn edit_keyboard(&self, target: MessageHandle, keyboard: &[Vec<Button>]) -> Delivery;

    /// Send an image by URL or local path
    async fn send_media(&self, chat_id: i64, media: &str, caption: Option<&str>) -> Delivery;
}
