//! # Relay Router Module
//!
//! Tracks which participants are currently writing to their order
//! counterpart, so their next free-text message is forwarded instead of
//! being read as wizard input.

use dashmap::DashMap;

/// How long a relay entry lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayMode {
    /// Cleared after one forwarded message
    #[default]
    SingleShot,
    /// Kept until an explicit end-chat action
    Toggled,
}

impl RelayMode {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "single" | "single-shot" | "singleshot" => Some(RelayMode::SingleShot),
            "toggled" | "toggle" => Some(RelayMode::Toggled),
            _ => None,
        }
    }
}

/// Side of an order conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    Operator,
    Customer,
}

impl Party {
    pub fn counterpart(self) -> Party {
        match self {
            Party::Operator => Party::Customer,
            Party::Customer => Party::Operator,
        }
    }
}

#[derive(Debug, Default)]
pub struct RelayRouter {
    mode: RelayMode,
    operators: DashMap<i64, String>,
    customers: DashMap<i64, String>,
}

impl RelayRouter {
    pub fn new(mode: RelayMode) -> Self {
        Self {
            mode,
            operators: DashMap::new(),
            customers: DashMap::new(),
        }
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    fn entries(&self, party: Party) -> &DashMap<i64, String> {
        match party {
            Party::Operator => &self.operators,
            Party::Customer => &self.customers,
        }
    }

    /// Route the participant's next free-text message to the order counterpart.
    /// Replaces any relay the participant already had open.
    pub fn begin(&self, party: Party, participant: i64, order_number: &str) -> Option<String> {
        self.entries(party)
            .insert(participant, order_number.to_string())
    }

    /// Order the participant's incoming text should be forwarded to.
    /// In single-shot mode the entry is consumed.
    pub fn route(&self, party: Party, participant: i64) -> Option<String> {
        match self.mode {
            RelayMode::SingleShot => self
                .entries(party)
                .remove(&participant)
                .map(|(_, order)| order),
            RelayMode::Toggled => self
                .entries(party)
                .get(&participant)
                .map(|order| order.value().clone()),
        }
    }

    /// Close the participant's relay without waiting for a message
    pub fn end(&self, party: Party, participant: i64) -> Option<String> {
        self.entries(party)
            .remove(&participant)
            .map(|(_, order)| order)
    }

    pub fn active(&self, party: Party, participant: i64) -> Option<String> {
        self.entries(party)
            .get(&participant)
            .map(|order| order.value().clone())
    }
}
