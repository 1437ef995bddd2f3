//! # Pricing Module
//!
//! Derives priced line items and the grand total from a session's baskets
//! and renders the order summary shown on the summary screen, to the
//! operator and on the customer's tracking message.

use crate::catalog::{Catalog, Category};
use crate::dialogue::{DeliveryMethod, Session};
use crate::localization::{t, t_args};
use crate::order_seq::OrderCounter;

/// One basket entry with its price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub category: Category,
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u32,
    pub line_total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSummary {
    pub lines: Vec<PricedLine>,
    pub total: u32,
}

impl PriceSummary {
    pub fn lines_for(&self, category: Category) -> impl Iterator<Item = &PricedLine> {
        self.lines.iter().filter(move |line| line.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn money(amount: u32) -> String {
    t_args("money", &[("amount", &amount.to_string())])
}

/// Price every basket entry, grouped in summary order and in menu order within a group.
/// Ids missing from the catalog are skipped.
pub fn price_session(session: &Session, catalog: &Catalog) -> PriceSummary {
    let mut summary = PriceSummary::default();

    for category in Category::SUMMARY_ORDER {
        let Some(state) = session.category(category) else {
            continue;
        };
        for id in state.basket.keys() {
            debug_assert!(catalog.contains(category, id), "basket holds unknown id {id}");
        }
        for item in catalog.items(category) {
            let Some(&quantity) = state.basket.get(item.id) else {
                continue;
            };
            if quantity == 0 {
                continue;
            }
            let line_total = item.price * quantity;
            summary.total += line_total;
            summary.lines.push(PricedLine {
                category,
                id: item.id.to_string(),
                name: item.name.to_string(),
                quantity,
                unit_price: item.price,
                line_total,
            });
        }
    }

    summary
}

fn line_key(category: Category) -> &'static str {
    match category {
        Category::Mains => "summary-line-mains",
        Category::Sides => "summary-line-sides",
        Category::Desserts => "summary-line-desserts",
        Category::Drinks => "summary-line-drinks",
        Category::Addons => "summary-line-addons",
    }
}

fn render_line(line: &PricedLine) -> String {
    t_args(
        line_key(line.category),
        &[("name", &line.name), ("qty", &line.quantity.to_string())],
    )
}

/// Render the order summary without touching the order number
pub fn format_summary(session: &Session, catalog: &Catalog, order_number: &str) -> String {
    let priced = price_session(session, catalog);
    let mut lines = vec![t("summary-items-title")];

    for category in Category::SUMMARY_ORDER {
        if category == Category::Addons {
            continue;
        }
        lines.extend(priced.lines_for(category).map(render_line));
    }

    let mut addons = priced.lines_for(Category::Addons).peekable();
    if addons.peek().is_some() {
        lines.push(String::new());
        lines.push(t("summary-addons-title"));
        lines.extend(addons.map(render_line));
    }

    lines.push(String::new());
    if let Some(method) = session.delivery_method {
        let method_label = match method {
            DeliveryMethod::Delivery => t("delivery-method-delivery"),
            DeliveryMethod::Pickup => t("delivery-method-pickup"),
        };
        lines.push(t_args("summary-method", &[("method", &method_label)]));
    }
    if session.delivery_method == Some(DeliveryMethod::Delivery) {
        if let Some(address) = &session.address {
            lines.push(t_args("summary-address", &[("address", address)]));
        }
    }
    if let Some(phone) = &session.phone {
        lines.push(t_args("summary-phone", &[("phone", phone)]));
    }
    if let Some(comment) = session.comment.as_deref().filter(|c| !c.is_empty()) {
        lines.push(t_args("summary-comment", &[("comment", comment)]));
    }

    lines.push(String::new());
    lines.push(t_args("summary-total", &[("total", &money(priced.total))]));

    format!(
        "{}\n\n{}",
        t_args("summary-order-number", &[("order", order_number)]),
        lines.join("\n")
    )
}

/// Order number of the session, drawing a new one from the counter the first time
pub fn ensure_order_number(session: &mut Session, counter: &dyn OrderCounter) -> String {
    session
        .order_number
        .get_or_insert_with(|| counter.next_order_number())
        .clone()
}

/// Render the summary, assigning the session's order number on first use
pub fn render_summary(session: &mut Session, catalog: &Catalog, counter: &dyn OrderCounter) -> String {
    let order_number = ensure_order_number(session, counter);
    format_summary(session, catalog, &order_number)
}

/// Cart listing with the running total
pub fn format_cart(session: &Session, catalog: &Catalog) -> String {
    let priced = price_session(session, catalog);
    let mut lines = vec![t("cart-title")];

    if priced.is_empty() {
        lines.push(String::new());
        lines.push(t("cart-empty"));
    } else {
        for category in Category::SUMMARY_ORDER {
            let mut entries = priced.lines_for(category).peekable();
            if entries.peek().is_none() {
                continue;
            }
            lines.push(String::new());
            lines.push(t(group_key(category)));
            lines.extend(entries.map(|line| {
                t_args(
                    "cart-line",
                    &[
                        ("name", &line.name),
                        ("qty", &line.quantity.to_string()),
                        ("price", &money(line.line_total)),
                    ],
                )
            }));
        }
        lines.push(String::new());
        lines.push(t_args("summary-total", &[("total", &money(priced.total))]));
    }

    lines.join("\n")
}

/// Localization key of a category's group heading
pub fn group_key(category: Category) -> &'static str {
    match category {
        Category::Mains => "category-mains",
        Category::Addons => "category-addons",
        Category::Sides => "category-sides",
        Category::Desserts => "category-desserts",
        Category::Drinks => "category-drinks",
    }
}
