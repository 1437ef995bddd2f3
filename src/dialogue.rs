//! Order dialogue module: per-customer wizard state and input validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::catalog::Category;

/// Longest address or comment accepted from free text
pub const MAX_FREE_TEXT_LEN: usize = 500;

static PHONE_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone regex"));

/// Identifies a screen of the wizard, including the queue position of quantity prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenRef {
    Delivery,
    Address,
    PhoneSelection,
    PhoneEntry,
    Home,
    Select(Category),
    Qty(Category, usize),
    AddonPrompt,
    Cart,
    Comment,
    Summary,
}

impl ScreenRef {
    /// Free-text input the screen expects, if any
    pub fn awaiting(self) -> Option<Awaiting> {
        match self {
            ScreenRef::Address => Some(Awaiting::Address),
            ScreenRef::PhoneSelection | ScreenRef::PhoneEntry => Some(Awaiting::Phone),
            ScreenRef::Comment => Some(Awaiting::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Awaiting {
    Address,
    Phone,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

impl DeliveryMethod {
    pub fn slug(self) -> &'static str {
        match self {
            DeliveryMethod::Delivery => "delivery",
            DeliveryMethod::Pickup => "pickup",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "delivery" => Some(DeliveryMethod::Delivery),
            "pickup" => Some(DeliveryMethod::Pickup),
            _ => None,
        }
    }
}

/// Selection, quantity queue and basket for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState {
    pub selected: BTreeSet<String>,
    pub queue: Vec<String>,
    pub cursor: usize,
    pub basket: BTreeMap<String, u32>,
}

impl CategoryState {
    /// Flip membership of an id in the selection set
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Forget the current pass through the category; the basket survives
    pub fn begin_pass(&mut self) {
        self.selected.clear();
        self.queue.clear();
        self.cursor = 0;
    }

    /// Item awaiting a quantity at the cursor
    pub fn current(&self) -> Option<&str> {
        self.queue.get(self.cursor).map(String::as_str)
    }

    pub fn add_quantity(&mut self, id: &str, quantity: u32) {
        *self.basket.entry(id.to_string()).or_insert(0) += quantity;
    }
}

/// Per-customer wizard state for one in-progress order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Session {
    pub history: Vec<ScreenRef>,
    pub awaiting: Option<Awaiting>,
    pub delivery_method: Option<DeliveryMethod>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub comment: Option<String>,
    pub categories: BTreeMap<Category, CategoryState>,
    pub order_number: Option<String>,
}

impl Session {
    /// Screen on top of the navigation history
    pub fn current_screen(&self) -> Option<ScreenRef> {
        self.history.last().copied()
    }

    /// Push a screen unless it is already on top
    pub fn push_screen(&mut self, screen: ScreenRef) {
        if self.history.last() != Some(&screen) {
            self.history.push(screen);
        }
    }

    /// Start a fresh pass through `category`; quantity prompts of earlier passes leave the history
    pub fn begin_pass(&mut self, category: Category) {
        self.category_mut(category).begin_pass();
        self.history
            .retain(|screen| !matches!(screen, ScreenRef::Qty(on, _) if *on == category));
    }

    /// Whether a quantity prompt still points into its category's queue
    pub fn prompt_is_live(&self, category: Category, index: usize) -> bool {
        self.category(category)
            .is_some_and(|state| index < state.queue.len())
    }

    pub fn category(&self, category: Category) -> Option<&CategoryState> {
        self.categories.get(&category)
    }

    pub fn category_mut(&mut self, category: Category) -> &mut CategoryState {
        self.categories.entry(category).or_default()
    }

    /// Quantity in the basket for an id, zero when absent
    pub fn basket_quantity(&self, category: Category, id: &str) -> u32 {
        self.category(category)
            .and_then(|state| state.basket.get(id).copied())
            .unwrap_or(0)
    }

    pub fn basket_is_empty(&self) -> bool {
        self.categories.values().all(|state| state.basket.is_empty())
    }

    pub fn clear_baskets(&mut self) {
        for state in self.categories.values_mut() {
            state.basket.clear();
        }
    }
}

/// Type alias for the order dialogue
pub type OrderDialogue = Dialogue<Session, InMemStorage<Session>>;

/// Validates a phone number and returns it in the masked display form
/// `+38 (0XX) - XXX - XX - XX`.
pub fn validate_phone(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if !PHONE_INPUT.is_match(trimmed) {
        return Err("malformed");
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let full = match digits.len() {
        12 if digits.starts_with("380") => digits,
        11 if digits.starts_with("80") => format!("3{digits}"),
        10 if digits.starts_with('0') => format!("38{digits}"),
        _ => return Err("malformed"),
    };

    Ok(format!(
        "+{} ({}) - {} - {} - {}",
        &full[0..2],
        &full[2..5],
        &full[5..8],
        &full[8..10],
        &full[10..12]
    ))
}

/// Validates free text such as an address or a comment
pub fn validate_free_text(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.chars().count() > MAX_FREE_TEXT_LEN {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}
