//! # Order Registry Module
//!
//! Process-wide table of placed orders keyed by order number. Each record
//! holds the message handles needed to patch both the operator panel and the
//! customer's tracking message when the status changes.

use dashmap::{mapref::entry::Entry, DashMap};

use crate::sink::MessageHandle;

/// Lifecycle of a placed order. Variants are declared in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    New,
    Accepted,
    Cooking,
    CourierEnRoute,
    Done,
}

impl OrderStatus {
    /// Statuses the operator can set, in button order
    pub const OPERATOR_CHOICES: [OrderStatus; 4] = [
        OrderStatus::Accepted,
        OrderStatus::Cooking,
        OrderStatus::CourierEnRoute,
        OrderStatus::Done,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Accepted => "accept",
            OrderStatus::Cooking => "cooking",
            OrderStatus::CourierEnRoute => "courier",
            OrderStatus::Done => "done",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "new" => Some(OrderStatus::New),
            "accept" => Some(OrderStatus::Accepted),
            "cooking" => Some(OrderStatus::Cooking),
            "courier" => Some(OrderStatus::CourierEnRoute),
            "done" => Some(OrderStatus::Done),
            _ => None,
        }
    }

    /// Localization key of the status label
    pub fn label_key(self) -> &'static str {
        match self {
            OrderStatus::New => "status-new",
            OrderStatus::Accepted => "status-accepted",
            OrderStatus::Cooking => "status-cooking",
            OrderStatus::CourierEnRoute => "status-courier",
            OrderStatus::Done => "status-done",
        }
    }

    /// Statuses only move forward; skipping ahead is allowed
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        next > self
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Done
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_number: String,
    pub customer_chat_id: i64,
    pub customer_status_message: Option<MessageHandle>,
    pub operator_message: Option<MessageHandle>,
    /// Order summary frozen at confirmation time
    pub summary_text: String,
    /// Operator panel text above the status line, frozen at confirmation time
    pub operator_header: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Duplicate(String),
    NotFound(String),
    StaleTransition {
        order: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Duplicate(order) => write!(f, "order {order} is already registered"),
            RegistryError::NotFound(order) => write!(f, "order {order} is not registered"),
            RegistryError::StaleTransition { order, from, to } => {
                write!(f, "order {order} cannot move from {from:?} to {to:?}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Concurrent order table; every mutation is atomic with respect to its own key
#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: DashMap<String, OrderRecord>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }

    /// Register a freshly placed order
    pub fn insert(&self, record: OrderRecord) -> Result<(), RegistryError> {
        match self.orders.entry(record.order_number.clone()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate(record.order_number)),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    pub fn get(&self, order_number: &str) -> Option<OrderRecord> {
        self.orders.get(order_number).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, order_number: &str) -> bool {
        self.orders.contains_key(order_number)
    }

    /// Move an order to a later status and return the updated record
    pub fn transition(&self, order_number: &str, next: OrderStatus) -> Result<OrderRecord, RegistryError> {
        let mut entry = self
            .orders
            .get_mut(order_number)
            .ok_or_else(|| RegistryError::NotFound(order_number.to_string()))?;

        if !entry.status.can_advance_to(next) {
            return Err(RegistryError::StaleTransition {
                order: order_number.to_string(),
                from: entry.status,
                to: next,
            });
        }

        entry.status = next;
        Ok(entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
