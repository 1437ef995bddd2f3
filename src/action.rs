//! # Action Module
//!
//! Decodes the namespaced callback payloads carried by inline buttons
//! (`namespace:action:args`) into a structured [`Action`]. Anything that
//! does not decode becomes [`Action::Unknown`] and is dropped by the handlers.

use crate::catalog::Category;
use crate::dialogue::DeliveryMethod;
use crate::registry::OrderStatus;

/// Highest quantity offered on the quantity grid
pub const MAX_QUANTITY: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Open,
    Clear,
    Checkout,
}

/// A decoded button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ship(DeliveryMethod),
    Back,
    Restart,
    Home,
    Browse(Category),
    PhoneManual,
    Toggle(Category, String),
    Continue(Category),
    Quantity(Category, String, u32),
    Addons(bool),
    SkipComment,
    Cart(CartAction),
    Confirm,
    SetStatus { order: String, status: OrderStatus },
    MessageCustomer(String),
    MessageOperator(String),
    EndChat(String),
    Unknown(String),
}

impl Action {
    /// Decode a callback payload
    pub fn parse(data: &str) -> Self {
        Self::decode(data).unwrap_or_else(|| Action::Unknown(data.to_string()))
    }

    fn decode(data: &str) -> Option<Self> {
        let (namespace, rest) = data.split_once(':')?;
        let parts: Vec<&str> = rest.split(':').collect();

        let action = match (namespace, parts.as_slice()) {
            ("ship", [method]) => Action::Ship(DeliveryMethod::from_slug(method)?),
            ("nav", ["back"]) => Action::Back,
            ("nav", ["restart"]) => Action::Restart,
            ("nav", ["home"]) => Action::Home,
            ("nav", [slug]) => Action::Browse(Category::from_slug(slug)?),
            ("phone", ["manual"]) => Action::PhoneManual,
            ("addons", ["yes"]) => Action::Addons(true),
            ("addons", ["no"]) => Action::Addons(false),
            ("comment", ["skip"]) => Action::SkipComment,
            ("cart", ["open"]) => Action::Cart(CartAction::Open),
            ("cart", ["clear"]) => Action::Cart(CartAction::Clear),
            ("cart", ["checkout"]) => Action::Cart(CartAction::Checkout),
            ("order", ["confirm"]) => Action::Confirm,
            ("status", [order, status]) if !order.is_empty() => Action::SetStatus {
                order: order.to_string(),
                status: OrderStatus::from_slug(status)?,
            },
            ("opmsg", [order]) if !order.is_empty() => Action::MessageCustomer(order.to_string()),
            ("custmsg", [order]) if !order.is_empty() => Action::MessageOperator(order.to_string()),
            ("endchat", [order]) if !order.is_empty() => Action::EndChat(order.to_string()),
            (slug, ["toggle", id]) if !id.is_empty() => {
                Action::Toggle(Category::from_slug(slug)?, id.to_string())
            }
            (slug, ["continue"]) => Action::Continue(Category::from_slug(slug)?),
            (slug, ["qty", id, quantity]) if !id.is_empty() => {
                let quantity: u32 = quantity.parse().ok()?;
                if !(1..=MAX_QUANTITY).contains(&quantity) {
                    return None;
                }
                Action::Quantity(Category::from_slug(slug)?, id.to_string(), quantity)
            }
            _ => return None,
        };

        Some(action)
    }

    /// Encode back into a callback payload
    pub fn encode(&self) -> String {
        match self {
            Action::Ship(method) => format!("ship:{}", method.slug()),
            Action::Back => "nav:back".to_string(),
            Action::Restart => "nav:restart".to_string(),
            Action::Home => "nav:home".to_string(),
            Action::Browse(category) => format!("nav:{}", category.slug()),
            Action::PhoneManual => "phone:manual".to_string(),
            Action::Toggle(category, id) => format!("{}:toggle:{}", category.slug(), id),
            Action::Continue(category) => format!("{}:continue", category.slug()),
            Action::Quantity(category, id, quantity) => {
                format!("{}:qty:{}:{}", category.slug(), id, quantity)
            }
            Action::Addons(true) => "addons:yes".to_string(),
            Action::Addons(false) => "addons:no".to_string(),
            Action::SkipComment => "comment:skip".to_string(),
            Action::Cart(CartAction::Open) => "cart:open".to_string(),
            Action::Cart(CartAction::Clear) => "cart:clear".to_string(),
            Action::Cart(CartAction::Checkout) => "cart:checkout".to_string(),
            Action::Confirm => "order:confirm".to_string(),
            Action::SetStatus { order, status } => format!("status:{}:{}", order, status.slug()),
            Action::MessageCustomer(order) => format!("opmsg:{order}"),
            Action::MessageOperator(order) => format!("custmsg:{order}"),
            Action::EndChat(order) => format!("endchat:{order}"),
            Action::Unknown(raw) => raw.clone(),
        }
    }
}
