//! # Wizard Module
//!
//! The ordering state machine. Given a session and one inbound event (a
//! decoded button press, free text or a shared contact) it mutates the
//! session and describes exactly one screen to show. It never talks to the
//! transport; the bot handlers decide whether a screen edits the pressed
//! message or goes out as a new one.

use tracing::debug;

use crate::action::{Action, CartAction, MAX_QUANTITY};
use crate::catalog::{Catalog, Category};
use crate::dialogue::{
    validate_free_text, validate_phone, Awaiting, DeliveryMethod, ScreenRef, Session,
};
use crate::localization::{t, t_args};
use crate::order_seq::OrderCounter;
use crate::pricing::{format_cart, money, render_summary};
use crate::sink::{Button, Keyboard};

/// A rendered screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub text: String,
    pub keyboard: Keyboard,
    /// Also offer the transport's "share contact" keyboard
    pub request_contact: bool,
}

impl View {
    fn new(text: String, keyboard: Keyboard) -> Self {
        Self {
            text,
            keyboard,
            request_contact: false,
        }
    }
}

/// What the handler should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show a screen, optionally preceded by a short acknowledgement
    Show { view: View, notice: Option<String> },
    /// Only the buttons of the current screen changed
    Keyboard(View),
    /// Non-blocking validation notice; the session is unchanged
    Notice(String),
    /// The customer confirmed the summary; hand over to the order desk
    Confirm,
    /// Free text nobody was waiting for
    Fallback,
    /// Stale or malformed event, nothing to do
    Ignored,
}

impl Outcome {
    fn show(view: View) -> Self {
        Outcome::Show { view, notice: None }
    }

    fn show_with_notice(view: View, notice: String) -> Self {
        Outcome::Show {
            view,
            notice: Some(notice),
        }
    }
}

/// Screen that follows the last quantity prompt of a category
pub fn screen_after(category: Category) -> ScreenRef {
    match category {
        Category::Mains => ScreenRef::AddonPrompt,
        Category::Addons => ScreenRef::Comment,
        Category::Sides | Category::Desserts | Category::Drinks => ScreenRef::Home,
    }
}

fn back_row() -> Vec<Button> {
    vec![Button::new(t("button-back"), Action::Back.encode())]
}

fn select_prompt_key(category: Category) -> &'static str {
    match category {
        Category::Mains => "select-prompt-mains",
        Category::Addons => "select-prompt-addons",
        Category::Sides => "select-prompt-sides",
        Category::Desserts => "select-prompt-desserts",
        Category::Drinks => "select-prompt-drinks",
    }
}

fn home_button_key(category: Category) -> &'static str {
    match category {
        Category::Mains => "home-button-mains",
        Category::Addons => "home-button-addons",
        Category::Sides => "home-button-sides",
        Category::Desserts => "home-button-desserts",
        Category::Drinks => "home-button-drinks",
    }
}

pub struct Wizard<'a> {
    catalog: &'a Catalog,
    counter: &'a dyn OrderCounter,
}

impl<'a> Wizard<'a> {
    pub fn new(catalog: &'a Catalog, counter: &'a dyn OrderCounter) -> Self {
        Self { catalog, counter }
    }

    /// Discard the session and show the first screen
    pub fn start(&self, session: &mut Session) -> View {
        *session = Session::default();
        self.render(session, ScreenRef::Delivery)
    }

    /// Delivery method and phone are known, so the menu may be browsed
    fn contact_complete(session: &Session) -> bool {
        session.delivery_method.is_some() && session.phone.is_some()
    }

    fn on_screen(session: &Session, screen: ScreenRef) -> bool {
        session.current_screen() == Some(screen)
    }

    pub fn handle_action(&self, session: &mut Session, action: &Action) -> Outcome {
        match action {
            Action::Restart => Outcome::show(self.start(session)),
            Action::Back => Outcome::show(self.go_back(session)),
            Action::Ship(method) => {
                if !matches!(session.current_screen(), None | Some(ScreenRef::Delivery)) {
                    return Outcome::Ignored;
                }
                session.delivery_method = Some(*method);
                let next = match method {
                    DeliveryMethod::Delivery => ScreenRef::Address,
                    DeliveryMethod::Pickup => ScreenRef::PhoneSelection,
                };
                Outcome::show(self.render(session, next))
            }
            Action::PhoneManual => {
                if !Self::on_screen(session, ScreenRef::PhoneSelection) {
                    return Outcome::Ignored;
                }
                Outcome::show(self.render(session, ScreenRef::PhoneEntry))
            }
            Action::Home => {
                if !Self::contact_complete(session) {
                    return Outcome::Ignored;
                }
                Outcome::show(self.render(session, ScreenRef::Home))
            }
            Action::Browse(category) => {
                if *category == Category::Addons || !Self::contact_complete(session) {
                    return Outcome::Ignored;
                }
                session.begin_pass(*category);
                Outcome::show(self.render(session, ScreenRef::Select(*category)))
            }
            Action::Toggle(category, id) => self.toggle(session, *category, id),
            Action::Continue(category) => self.continue_selection(session, *category),
            Action::Quantity(category, id, quantity) => {
                self.record_quantity(session, *category, id, *quantity)
            }
            Action::Addons(wants_addons) => {
                if !Self::on_screen(session, ScreenRef::AddonPrompt) {
                    return Outcome::Ignored;
                }
                if *wants_addons {
                    session.begin_pass(Category::Addons);
                    Outcome::show(self.render(session, ScreenRef::Select(Category::Addons)))
                } else {
                    Outcome::show(self.render(session, ScreenRef::Comment))
                }
            }
            Action::SkipComment => {
                if !Self::on_screen(session, ScreenRef::Comment) {
                    return Outcome::Ignored;
                }
                session.comment = None;
                Outcome::show(self.render(session, ScreenRef::Summary))
            }
            Action::Cart(cart_action) => self.cart(session, cart_action),
            Action::Confirm => {
                if !Self::on_screen(session, ScreenRef::Summary) {
                    return Outcome::Ignored;
                }
                if session.basket_is_empty() {
                    return Outcome::Notice(t("alert-cart-empty"));
                }
                Outcome::Confirm
            }
            Action::SetStatus { .. }
            | Action::MessageCustomer(_)
            | Action::MessageOperator(_)
            | Action::EndChat(_)
            | Action::Unknown(_) => Outcome::Ignored,
        }
    }

    fn toggle(&self, session: &mut Session, category: Category, id: &str) -> Outcome {
        if !Self::on_screen(session, ScreenRef::Select(category)) || !self.catalog.contains(category, id) {
            return Outcome::Ignored;
        }
        session.category_mut(category).toggle(id);
        Outcome::Keyboard(self.select_view(session, category))
    }

    fn continue_selection(&self, session: &mut Session, category: Category) -> Outcome {
        if !Self::on_screen(session, ScreenRef::Select(category)) {
            return Outcome::Ignored;
        }
        let Some(current) = session
            .category(category)
            .filter(|state| !state.selected.is_empty())
        else {
            return Outcome::Notice(t("alert-select-at-least-one"));
        };

        // queue follows menu order, not toggle order
        let queue: Vec<String> = self
            .catalog
            .items(category)
            .iter()
            .filter(|item| current.selected.contains(item.id))
            .map(|item| item.id.to_string())
            .collect();

        let state = session.category_mut(category);
        state.queue = queue;
        state.cursor = 0;

        Outcome::show(self.render(session, ScreenRef::Qty(category, 0)))
    }

    fn record_quantity(&self, session: &mut Session, category: Category, id: &str, quantity: u32) -> Outcome {
        let Some(ScreenRef::Qty(screen_category, index)) = session.current_screen() else {
            return Outcome::Ignored;
        };
        if screen_category != category || !(1..=MAX_QUANTITY).contains(&quantity) {
            return Outcome::Ignored;
        }
        let state = session.category_mut(category);
        if state.cursor != index || state.current() != Some(id) {
            debug!(category = ?category, id = %id, index, "Dropping quantity for a stale prompt");
            return Outcome::Ignored;
        }
        if !self.catalog.contains(category, id) {
            return Outcome::Ignored;
        }

        state.add_quantity(id, quantity);
        let next = if index + 1 < state.queue.len() {
            ScreenRef::Qty(category, index + 1)
        } else {
            screen_after(category)
        };
        Outcome::show(self.render(session, next))
    }

    fn cart(&self, session: &mut Session, cart_action: &CartAction) -> Outcome {
        match cart_action {
            CartAction::Open => {
                if !Self::contact_complete(session) {
                    return Outcome::Ignored;
                }
                Outcome::show(self.render(session, ScreenRef::Cart))
            }
            CartAction::Clear => {
                if !Self::on_screen(session, ScreenRef::Cart) {
                    return Outcome::Ignored;
                }
                session.clear_baskets();
                Outcome::show_with_notice(self.render(session, ScreenRef::Cart), t("cart-cleared"))
            }
            CartAction::Checkout => {
                if !Self::on_screen(session, ScreenRef::Cart) {
                    return Outcome::Ignored;
                }
                if session.basket_is_empty() {
                    return Outcome::Notice(t("alert-cart-empty"));
                }
                Outcome::show(self.render(session, ScreenRef::Comment))
            }
        }
    }

    /// Pop the current screen and re-render whatever is underneath
    pub fn go_back(&self, session: &mut Session) -> View {
        session.history.pop();
        while let Some(ScreenRef::Qty(category, index)) = session.current_screen() {
            if session.prompt_is_live(category, index) {
                break;
            }
            debug!(category = ?category, index, "Skipping a quantity prompt from an earlier pass");
            session.history.pop();
        }
        match session.current_screen() {
            Some(screen) => self.render(session, screen),
            None => self.render(session, ScreenRef::Delivery),
        }
    }

    pub fn handle_text(&self, session: &mut Session, text: &str) -> Outcome {
        match session.awaiting {
            Some(Awaiting::Address) => match validate_free_text(text) {
                Ok(address) => {
                    session.address = Some(address);
                    Outcome::show_with_notice(self.render(session, ScreenRef::PhoneSelection), t("address-saved"))
                }
                Err(_) => Outcome::Notice(t("address-invalid")),
            },
            Some(Awaiting::Phone) => match validate_phone(text) {
                Ok(phone) => self.accept_phone(session, phone),
                Err(_) => Outcome::Notice(t("phone-invalid")),
            },
            Some(Awaiting::Comment) => match validate_free_text(text) {
                Ok(comment) => {
                    session.comment = Some(comment);
                    Outcome::show_with_notice(self.render(session, ScreenRef::Summary), t("comment-saved"))
                }
                Err(_) => Outcome::Notice(t("comment-invalid")),
            },
            None => Outcome::Fallback,
        }
    }

    /// A phone number shared through the transport's contact button
    pub fn handle_contact(&self, session: &mut Session, phone_number: &str) -> Outcome {
        if session.awaiting != Some(Awaiting::Phone) {
            return Outcome::Ignored;
        }
        match validate_phone(phone_number) {
            Ok(phone) => self.accept_phone(session, phone),
            Err(_) => Outcome::Notice(t("phone-invalid")),
        }
    }

    fn accept_phone(&self, session: &mut Session, phone: String) -> Outcome {
        let notice = t_args("phone-saved", &[("phone", &phone)]);
        session.phone = Some(phone);
        Outcome::show_with_notice(self.render(session, ScreenRef::Home), notice)
    }

    /// Make `screen` current and build its view
    pub fn render(&self, session: &mut Session, screen: ScreenRef) -> View {
        match screen {
            ScreenRef::Delivery => {
                session.history.clear();
            }
            ScreenRef::Qty(category, index) => {
                if !session.prompt_is_live(category, index) {
                    debug!(category = ?category, index, "Quantity prompt outside its queue, showing home");
                    if session.current_screen() == Some(screen) {
                        session.history.pop();
                    }
                    return self.render(session, ScreenRef::Home);
                }
                session.category_mut(category).cursor = index;
            }
            _ => {}
        }

        session.awaiting = screen.awaiting();
        session.push_screen(screen);

        match screen {
            ScreenRef::Delivery => View::new(
                t("delivery-prompt"),
                vec![
                    vec![Button::new(t("button-delivery"), Action::Ship(DeliveryMethod::Delivery).encode())],
                    vec![Button::new(t("button-pickup"), Action::Ship(DeliveryMethod::Pickup).encode())],
                ],
            ),
            ScreenRef::Address => View::new(t("address-prompt"), vec![back_row()]),
            ScreenRef::PhoneSelection => View {
                text: t("phone-selection-prompt"),
                keyboard: vec![
                    vec![Button::new(t("button-phone-manual"), Action::PhoneManual.encode())],
                    back_row(),
                ],
                request_contact: true,
            },
            ScreenRef::PhoneEntry => View::new(t("phone-entry-prompt"), vec![back_row()]),
            ScreenRef::Home => {
                let mut keyboard: Keyboard = Category::HOME
                    .iter()
                    .map(|category| {
                        vec![Button::new(t(home_button_key(*category)), Action::Browse(*category).encode())]
                    })
                    .collect();
                keyboard.push(vec![Button::new(t("button-cart"), Action::Cart(CartAction::Open).encode())]);
                keyboard.push(back_row());
                View::new(t("home-prompt"), keyboard)
            }
            ScreenRef::Select(category) => self.select_view(session, category),
            ScreenRef::Qty(category, index) => self.qty_view(session, category, index),
            ScreenRef::AddonPrompt => View::new(
                t("addons-prompt"),
                vec![
                    vec![Button::new(t("button-yes"), Action::Addons(true).encode())],
                    vec![Button::new(t("button-no"), Action::Addons(false).encode())],
                    back_row(),
                ],
            ),
            ScreenRef::Cart => {
                let mut keyboard = vec![
                    vec![Button::new(t("button-to-menu"), Action::Home.encode())],
                    vec![Button::new(t("button-cart-clear"), Action::Cart(CartAction::Clear).encode())],
                ];
                if !session.basket_is_empty() {
                    keyboard.push(vec![Button::new(
                        t("button-checkout"),
                        Action::Cart(CartAction::Checkout).encode(),
                    )]);
                }
                keyboard.push(back_row());
                View::new(format_cart(session, self.catalog), keyboard)
            }
            ScreenRef::Comment => View::new(
                t("comment-prompt"),
                vec![
                    vec![Button::new(t("button-skip"), Action::SkipComment.encode())],
                    back_row(),
                ],
            ),
            ScreenRef::Summary => View::new(
                render_summary(session, self.catalog, self.counter),
                vec![
                    vec![Button::new(t("button-confirm"), Action::Confirm.encode())],
                    back_row(),
                ],
            ),
        }
    }

    /// Multi-toggle screen over a category
    fn select_view(&self, session: &Session, category: Category) -> View {
        let selected = session.category(category).map(|state| &state.selected);
        let items = self.catalog.items(category);

        let mut text = t(select_prompt_key(category));
        for item in items {
            if let Some(note) = item.note {
                text.push_str(&format!("\n• {} — {}", item.name, note));
            }
        }

        let mut keyboard: Keyboard = items
            .iter()
            .map(|item| {
                let mark = if selected.is_some_and(|set| set.contains(item.id)) {
                    "☑"
                } else {
                    "□"
                };
                vec![Button::new(
                    format!("{} {} — {}", mark, item.name, money(item.price)),
                    Action::Toggle(category, item.id.to_string()).encode(),
                )]
            })
            .collect();
        keyboard.push(vec![Button::new(t("button-continue"), Action::Continue(category).encode())]);
        keyboard.push(back_row());

        View::new(text, keyboard)
    }

    fn qty_view(&self, session: &Session, category: Category, index: usize) -> View {
        let item_id = session
            .category(category)
            .and_then(|state| state.queue.get(index))
            .map(String::as_str)
            .unwrap_or_default();
        let name = self
            .catalog
            .lookup(category, item_id)
            .map(|item| item.name)
            .unwrap_or(item_id);

        let prompt_key = if category == Category::Addons {
            "qty-prompt-addons"
        } else {
            "qty-prompt"
        };

        let mut keyboard: Keyboard = (0..3)
            .map(|row| {
                (1..=3)
                    .map(|col| {
                        let quantity = row * 3 + col;
                        Button::new(
                            quantity.to_string(),
                            Action::Quantity(category, item_id.to_string(), quantity).encode(),
                        )
                    })
                    .collect()
            })
            .collect();
        keyboard.push(back_row());

        View::new(t_args(prompt_key, &[("name", name)]), keyboard)
    }
}
