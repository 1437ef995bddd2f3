//! # Order Desk Module
//!
//! Everything that happens after the customer confirms: placing the order,
//! operator status changes with their fan-out to the customer, and relaying
//! free-text messages between the two sides.
//!
//! Outbound messages are best effort. The registry is authoritative: a
//! failed send or edit is logged and reported in the returned report, never
//! turned into an error for the caller.

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::action::Action;
use crate::catalog::Catalog;
use crate::dialogue::Session;
use crate::localization::{t, t_args};
use crate::order_seq::OrderCounter;
use crate::pricing::{ensure_order_number, format_summary};
use crate::registry::{OrderRecord, OrderRegistry, OrderStatus, RegistryError};
use crate::relay::{Party, RelayMode, RelayRouter};
use crate::sink::{Button, ChatSink, Delivery, DeliveryError, Keyboard, MessageHandle};
use crate::wizard::Wizard;

/// Operator-facing settings of the desk
#[derive(Debug, Clone)]
pub struct DeskSettings {
    /// The single identity allowed to change statuses and write to customers
    pub operator_id: i64,
    /// Image sent to the customer together with the `done` notification
    pub done_media: Option<String>,
}

/// The chat participant behind an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub chat_id: i64,
    pub user_id: i64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    PermissionDenied,
    UnknownOrder(String),
    NotOrderOwner(String),
    AlreadyPlaced(String),
    EmptyBasket,
    NoActiveChat(String),
    Registry(RegistryError),
}

impl DeskError {
    /// Notice shown to the participant who triggered the error
    pub fn user_message(&self) -> String {
        match self {
            DeskError::PermissionDenied | DeskError::NotOrderOwner(_) => t("alert-permission-denied"),
            DeskError::UnknownOrder(order) => t_args("alert-unknown-order", &[("order", order)]),
            DeskError::AlreadyPlaced(order) => t_args("alert-already-placed", &[("order", order)]),
            DeskError::EmptyBasket => t("alert-cart-empty"),
            DeskError::NoActiveChat(_) => t("alert-no-active-chat"),
            DeskError::Registry(RegistryError::StaleTransition { from, .. }) => {
                t_args("alert-stale-status", &[("status", &t(from.label_key()))])
            }
            DeskError::Registry(RegistryError::NotFound(order))
            | DeskError::Registry(RegistryError::Duplicate(order)) => {
                t_args("alert-unknown-order", &[("order", order)])
            }
        }
    }
}

impl std::fmt::Display for DeskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeskError::PermissionDenied => write!(f, "Permission denied"),
            DeskError::UnknownOrder(order) => write!(f, "Unknown order {order}"),
            DeskError::NotOrderOwner(order) => write!(f, "Order {order} belongs to another customer"),
            DeskError::AlreadyPlaced(order) => write!(f, "Order {order} was already placed"),
            DeskError::EmptyBasket => write!(f, "Basket is empty"),
            DeskError::NoActiveChat(order) => write!(f, "No active chat for order {order}"),
            DeskError::Registry(e) => write!(f, "Registry error: {e}"),
        }
    }
}

impl std::error::Error for DeskError {}

impl From<RegistryError> for DeskError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(order) => DeskError::UnknownOrder(order),
            RegistryError::Duplicate(order) => DeskError::AlreadyPlaced(order),
            other => DeskError::Registry(other),
        }
    }
}

/// Per side-effect results of a status change
#[derive(Debug)]
pub struct StatusReport {
    pub record: OrderRecord,
    pub operator_display: Delivery,
    /// `None` when the customer never received a tracking message
    pub customer_patch: Option<Delivery>,
    pub customer_notice: Delivery,
    /// `None` unless the order is done and media is configured
    pub media: Option<Delivery>,
}

/// Result of forwarding one free-text message
#[derive(Debug)]
pub struct RelayReport {
    pub from: Party,
    pub order_number: String,
    pub delivery: Delivery,
}

/// Current local time as shown next to statuses
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

pub fn status_line(status: OrderStatus, timestamp: &str) -> String {
    t_args(
        "status-line",
        &[("status", &t(status.label_key())), ("time", timestamp)],
    )
}

/// Frozen text above the trailing status line
pub fn compose_display(base: &str, status_line: &str) -> String {
    format!("{base}\n\n{status_line}")
}

fn status_button_key(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::New => "status-button-new",
        OrderStatus::Accepted => "status-button-accept",
        OrderStatus::Cooking => "status-button-cooking",
        OrderStatus::CourierEnRoute => "status-button-courier",
        OrderStatus::Done => "status-button-done",
    }
}

pub struct OrderDesk {
    settings: DeskSettings,
    catalog: Arc<Catalog>,
    counter: Arc<dyn OrderCounter>,
    registry: OrderRegistry,
    relay: RelayRouter,
    sink: Arc<dyn ChatSink>,
}

impl OrderDesk {
    pub fn new(
        settings: DeskSettings,
        catalog: Arc<Catalog>,
        counter: Arc<dyn OrderCounter>,
        relay_mode: RelayMode,
        sink: Arc<dyn ChatSink>,
    ) -> Self {
        Self {
            settings,
            catalog,
            counter,
            registry: OrderRegistry::new(),
            relay: RelayRouter::new(relay_mode),
            sink,
        }
    }

    /// State machine bound to this desk's catalog and counter
    pub fn wizard(&self) -> Wizard<'_> {
        Wizard::new(&self.catalog, self.counter.as_ref())
    }

    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    pub fn relay(&self) -> &RelayRouter {
        &self.relay
    }

    pub fn settings(&self) -> &DeskSettings {
        &self.settings
    }

    pub fn is_operator(&self, participant_id: i64) -> bool {
        participant_id == self.settings.operator_id
    }

    fn end_chat_row(&self, order_number: &str) -> Option<Vec<Button>> {
        (self.relay.mode() == RelayMode::Toggled).then(|| {
            vec![Button::new(
                t("button-end-chat"),
                Action::EndChat(order_number.to_string()).encode(),
            )]
        })
    }

    /// Status buttons under the operator panel
    pub fn operator_keyboard(&self, order_number: &str) -> Keyboard {
        let mut keyboard: Keyboard = OrderStatus::OPERATOR_CHOICES
            .iter()
            .map(|status| {
                vec![Button::new(
                    t(status_button_key(*status)),
                    Action::SetStatus {
                        order: order_number.to_string(),
                        status: *status,
                    }
                    .encode(),
                )]
            })
            .collect();
        keyboard.push(vec![Button::new(
            t("button-message-customer"),
            Action::MessageCustomer(order_number.to_string()).encode(),
        )]);
        keyboard.extend(self.end_chat_row(order_number));
        keyboard
    }

    /// Buttons under the customer's tracking message
    pub fn customer_keyboard(&self, order_number: &str) -> Keyboard {
        let mut keyboard = vec![
            vec![Button::new(t("button-new-order"), Action::Restart.encode())],
            vec![Button::new(
                t("button-message-operator"),
                Action::MessageOperator(order_number.to_string()).encode(),
            )],
        ];
        keyboard.extend(self.end_chat_row(order_number));
        keyboard
    }

    /// Finalize the session's order: notify the operator, turn the customer's
    /// summary message into a tracking message and register the order.
    pub async fn place_order(
        &self,
        session: &mut Session,
        customer: &Participant,
        summary_message: Option<MessageHandle>,
    ) -> Result<OrderRecord, DeskError> {
        if session.basket_is_empty() {
            return Err(DeskError::EmptyBasket);
        }

        let order_number = ensure_order_number(session, self.counter.as_ref());
        if self.registry.contains(&order_number) {
            return Err(DeskError::AlreadyPlaced(order_number));
        }

        let summary_text = format_summary(session, &self.catalog, &order_number);
        let placed_at = timestamp();
        let line = status_line(OrderStatus::New, &placed_at);

        let customer_line = if self.is_operator(customer.user_id) {
            t_args("operator-test-customer", &[("id", &customer.user_id.to_string())])
        } else {
            t_args(
                "operator-customer",
                &[
                    ("name", &customer.display_name),
                    ("id", &customer.user_id.to_string()),
                ],
            )
        };
        let operator_header = format!(
            "{}\n{}\n{}\n\n{}",
            t_args("operator-new-order", &[("order", &order_number)]),
            t_args("operator-placed-at", &[("time", &placed_at)]),
            customer_line,
            summary_text
        );

        let operator_message = match self
            .sink
            .send_text(
                self.settings.operator_id,
                &compose_display(&operator_header, &line),
                &self.operator_keyboard(&order_number),
            )
            .await
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(order = %order_number, operator = self.settings.operator_id, error = %e, "Failed to send order to operator");
                None
            }
        };

        let tracking_text = compose_display(&summary_text, &line);
        let tracking_keyboard = self.customer_keyboard(&order_number);
        let edited = match summary_message {
            Some(handle) => match self.sink.edit_text(handle, &tracking_text, &tracking_keyboard).await {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(order = %order_number, user_id = customer.chat_id, error = %e, "Failed to turn summary into tracking message");
                    None
                }
            },
            None => None,
        };
        let customer_status_message = match edited {
            Some(handle) => Some(handle),
            None => match self
                .sink
                .send_text(customer.chat_id, &tracking_text, &tracking_keyboard)
                .await
            {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!(order = %order_number, user_id = customer.chat_id, error = %e, "Failed to send tracking message");
                    None
                }
            },
        };

        let record = OrderRecord {
            order_number: order_number.clone(),
            customer_chat_id: customer.chat_id,
            customer_status_message,
            operator_message,
            summary_text,
            operator_header,
            status: OrderStatus::New,
        };
        self.registry.insert(record.clone())?;

        info!(order = %order_number, user_id = customer.chat_id, "Order placed");
        Ok(record)
    }

    /// Operator-only status transition with best-effort fan-out to the customer
    pub async fn change_status(
        &self,
        actor: i64,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<StatusReport, DeskError> {
        if !self.is_operator(actor) {
            warn!(user_id = actor, order = %order_number, "Non-operator tried to change order status");
            return Err(DeskError::PermissionDenied);
        }

        let record = self.registry.transition(order_number, status)?;
        info!(order = %order_number, status = ?status, "Order status changed");

        let changed_at = timestamp();
        let line = status_line(status, &changed_at);

        let operator_display = match record.operator_message {
            Some(handle) => {
                self.sink
                    .edit_text(
                        handle,
                        &compose_display(&record.operator_header, &line),
                        &self.operator_keyboard(order_number),
                    )
                    .await
            }
            None => Err(DeliveryError::new("operator panel was never delivered")),
        };
        if let Err(e) = &operator_display {
            warn!(order = %order_number, error = %e, "Failed to update operator panel");
        }

        let customer_patch = match record.customer_status_message {
            Some(handle) => {
                let patch = self
                    .sink
                    .edit_text(
                        handle,
                        &compose_display(&record.summary_text, &line),
                        &self.customer_keyboard(order_number),
                    )
                    .await;
                if let Err(e) = &patch {
                    warn!(order = %order_number, user_id = record.customer_chat_id, error = %e, "Failed to edit customer status message");
                }
                Some(patch)
            }
            None => None,
        };

        let customer_notice = self
            .sink
            .send_text(
                record.customer_chat_id,
                &t_args(
                    "customer-status-changed",
                    &[("status", &t(status.label_key())), ("time", &changed_at)],
                ),
                &[],
            )
            .await;
        if let Err(e) = &customer_notice {
            warn!(order = %order_number, user_id = record.customer_chat_id, error = %e, "Failed to send status notification");
        }

        let media = match (&self.settings.done_media, status.is_terminal()) {
            (Some(media), true) => {
                let sent = self
                    .sink
                    .send_media(record.customer_chat_id, media, Some(&t("customer-done-caption")))
                    .await;
                if let Err(e) = &sent {
                    warn!(order = %order_number, user_id = record.customer_chat_id, error = %e, "Failed to send done media");
                }
                Some(sent)
            }
            _ => None,
        };

        Ok(StatusReport {
            record,
            operator_display,
            customer_patch,
            customer_notice,
            media,
        })
    }

    /// Route the actor's next free-text message to the other side of the order
    pub fn begin_relay(&self, actor: i64, party: Party, order_number: &str) -> Result<(), DeskError> {
        let record = self
            .registry
            .get(order_number)
            .ok_or_else(|| DeskError::UnknownOrder(order_number.to_string()))?;

        match party {
            Party::Operator if !self.is_operator(actor) => return Err(DeskError::PermissionDenied),
            Party::Customer if record.customer_chat_id != actor => {
                return Err(DeskError::NotOrderOwner(order_number.to_string()))
            }
            _ => {}
        }

        self.relay.begin(party, actor, order_number);
        info!(user_id = actor, party = ?party, order = %order_number, "Relay opened");
        Ok(())
    }

    /// Redraw the buttons of a panel after a relay was opened from it
    pub async fn refresh_controls(&self, party: Party, order_number: &str, target: MessageHandle) -> Delivery {
        let keyboard = match party {
            Party::Operator => self.operator_keyboard(order_number),
            Party::Customer => self.customer_keyboard(order_number),
        };
        let refreshed = self.sink.edit_keyboard(target, &keyboard).await;
        if let Err(e) = &refreshed {
            debug!(order = %order_number, chat_id = target.chat_id, error = %e, "Could not refresh panel buttons");
        }
        refreshed
    }

    /// Close the actor's relay for an order and tell the other side
    pub async fn end_relay(&self, actor: i64, order_number: &str) -> Result<Delivery, DeskError> {
        let party = if self.is_operator(actor)
            && self.relay.active(Party::Operator, actor).as_deref() == Some(order_number)
        {
            Party::Operator
        } else if self.relay.active(Party::Customer, actor).as_deref() == Some(order_number) {
            Party::Customer
        } else {
            return Err(DeskError::NoActiveChat(order_number.to_string()));
        };

        self.relay.end(party, actor);
        info!(user_id = actor, party = ?party, order = %order_number, "Relay closed");

        let record = self
            .registry
            .get(order_number)
            .ok_or_else(|| DeskError::UnknownOrder(order_number.to_string()))?;
        let recipient = match party.counterpart() {
            Party::Customer => record.customer_chat_id,
            Party::Operator => self.settings.operator_id,
        };

        let delivery = self
            .sink
            .send_text(recipient, &t_args("relay-chat-ended", &[("order", order_number)]), &[])
            .await;
        if let Err(e) = &delivery {
            warn!(order = %order_number, recipient, error = %e, "Failed to announce end of chat");
        }
        Ok(delivery)
    }

    /// Forward free text when the sender has an open relay.
    /// Returns `None` when the text belongs to the wizard.
    pub async fn relay_text(&self, sender: &Participant, text: &str) -> Option<RelayReport> {
        let operator_route = if self.is_operator(sender.user_id) {
            self.relay
                .route(Party::Operator, sender.user_id)
                .map(|order| (Party::Operator, order))
        } else {
            None
        };
        let (party, order_number) = operator_route.or_else(|| {
            self.relay
                .route(Party::Customer, sender.user_id)
                .map(|order| (Party::Customer, order))
        })?;

        let Some(record) = self.registry.get(&order_number) else {
            warn!(order = %order_number, "Relay points at an unregistered order");
            return Some(RelayReport {
                from: party,
                order_number,
                delivery: Err(DeliveryError::new("order is not registered")),
            });
        };

        let (recipient, body) = match party {
            Party::Operator => (
                record.customer_chat_id,
                format!(
                    "{}\n\n{}",
                    t_args("relay-from-operator", &[("order", &order_number)]),
                    text
                ),
            ),
            Party::Customer => (
                self.settings.operator_id,
                format!(
                    "{}\n{}\n\n{}",
                    t_args("relay-from-customer", &[("order", &order_number)]),
                    t_args(
                        "relay-customer-line",
                        &[
                            ("name", &sender.display_name),
                            ("id", &sender.user_id.to_string()),
                        ],
                    ),
                    text
                ),
            ),
        };

        let delivery = self.sink.send_text(recipient, &body, &[]).await;
        match &delivery {
            Ok(_) => info!(order = %order_number, from = ?party, recipient, "Relayed message"),
            Err(e) => warn!(order = %order_number, from = ?party, recipient, error = %e, "Failed to relay message"),
        }

        Some(RelayReport {
            from: party,
            order_number,
            delivery,
        })
    }
}
