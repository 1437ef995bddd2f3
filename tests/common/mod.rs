//! Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::sync::Mutex;

use shawarma_bot::action::Action;
use shawarma_bot::catalog::Category;
use shawarma_bot::dialogue::{DeliveryMethod, ScreenRef, Session};
use shawarma_bot::order_seq::{format_order_number, OrderCounter};
use shawarma_bot::sink::{Button, ChatSink, Delivery, DeliveryError, Keyboard, MessageHandle};
use shawarma_bot::wizard::{Outcome, View, Wizard};

/// Counter that hands out numbers for a fixed day
#[derive(Default)]
pub struct FixedCounter {
    seq: AtomicU32,
}

impl FixedCounter {
    pub fn calls(&self) -> u32 {
        self.seq.load(Ordering::SeqCst)
    }
}

impl OrderCounter for FixedCounter {
    fn next_order_number(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        format_order_number("20240101", seq)
    }
}

/// One outbound call seen by the recording sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Keyboard,
    },
    Edit {
        target: MessageHandle,
        text: String,
        keyboard: Keyboard,
    },
    EditKeyboard {
        target: MessageHandle,
        keyboard: Keyboard,
    },
    Media {
        chat_id: i64,
        media: String,
        caption: Option<String>,
    },
}

/// Chat sink that records every call and fails on demand
#[derive(Default)]
pub struct RecordingSink {
    log: Mutex<Vec<Sent>>,
    next_message_id: AtomicI32,
    fail_edits: AtomicBool,
    unreachable_chats: Mutex<HashSet<i64>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text { chat_id: to, text, .. } if to == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edits_of(&self, target: MessageHandle) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Edit { target: t, text, .. } if t == target => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub fn make_unreachable(&self, chat_id: i64) {
        self.unreachable_chats.lock().unwrap().insert(chat_id);
    }

    fn record(&self, sent: Sent) {
        self.log.lock().unwrap().push(sent);
    }

    fn reachable(&self, chat_id: i64) -> Result<(), DeliveryError> {
        if self.unreachable_chats.lock().unwrap().contains(&chat_id) {
            Err(DeliveryError::new(format!("chat {chat_id} is unreachable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: &[Vec<Button>]) -> Delivery {
        self.reachable(chat_id)?;
        self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.to_vec(),
        });
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 100;
        Ok(MessageHandle::new(chat_id, message_id))
    }

    async fn edit_text(&self, target: MessageHandle, text: &str, keyboard: &[Vec<Button>]) -> Delivery {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(DeliveryError::new("message can't be edited"));
        }
        self.reachable(target.chat_id)?;
        self.record(Sent::Edit {
            target,
            text: text.to_string(),
            keyboard: keyboard.to_vec(),
        });
        Ok(target)
    }

    async fn edit_keyboard(&self, target: MessageHandle, keyboard: &[Vec<Button>]) -> Delivery {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(DeliveryError::new("message can't be edited"));
        }
        self.record(Sent::EditKeyboard {
            target,
            keyboard: keyboard.to_vec(),
        });
        Ok(target)
    }

    async fn send_media(&self, chat_id: i64, media: &str, caption: Option<&str>) -> Delivery {
        self.reachable(chat_id)?;
        self.record(Sent::Media {
            chat_id,
            media: media.to_string(),
            caption: caption.map(str::to_string),
        });
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 100;
        Ok(MessageHandle::new(chat_id, message_id))
    }
}

/// Unwrap a screen outcome
pub fn shown(outcome: Outcome) -> View {
    match outcome {
        Outcome::Show { view, .. } => view,
        other => panic!("expected a screen, got {other:?}"),
    }
}

pub fn payloads(view: &View) -> Vec<String> {
    view.keyboard
        .iter()
        .flatten()
        .map(|button| button.payload.clone())
        .collect()
}

/// Pickup customer with a phone, standing on the home menu
pub fn session_at_home(wizard: &Wizard<'_>) -> Session {
    let mut session = Session::default();
    wizard.start(&mut session);
    shown(wizard.handle_action(&mut session, &Action::Ship(DeliveryMethod::Pickup)));
    shown(wizard.handle_text(&mut session, "0671234567"));
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));
    session
}

/// Pick `quantity` of each id in one pass through a category
pub fn order_items(wizard: &Wizard<'_>, session: &mut Session, category: Category, items: &[(&str, u32)]) {
    shown(wizard.handle_action(session, &Action::Browse(category)));
    pick_in_current_select(wizard, session, category, items);
}

/// Toggle, continue and answer every quantity prompt on an open select screen
pub fn pick_in_current_select(
    wizard: &Wizard<'_>,
    session: &mut Session,
    category: Category,
    items: &[(&str, u32)],
) {
    for (id, _) in items {
        let outcome = wizard.handle_action(session, &Action::Toggle(category, id.to_string()));
        assert!(matches!(outcome, Outcome::Keyboard(_)), "toggle of {id} was not applied");
    }
    shown(wizard.handle_action(session, &Action::Continue(category)));
    while let Some(ScreenRef::Qty(on, _)) = session.current_screen() {
        if on != category {
            break;
        }
        let id = session
            .category(category)
            .and_then(|state| state.current())
            .map(str::to_string)
            .expect("quantity prompt without an item");
        let (_, quantity) = items
            .iter()
            .find(|(wanted, _)| *wanted == id)
            .expect("prompted for an item that was not selected");
        shown(wizard.handle_action(session, &Action::Quantity(category, id, *quantity)));
    }
}

/// Koko x3, no add-ons, no comment; ends on the summary screen
pub fn session_at_summary(wizard: &Wizard<'_>) -> Session {
    let mut session = session_at_home(wizard);
    order_items(wizard, &mut session, Category::Mains, &[("koko", 3)]);
    assert_eq!(session.current_screen(), Some(ScreenRef::AddonPrompt));
    shown(wizard.handle_action(&mut session, &Action::Addons(false)));
    shown(wizard.handle_action(&mut session, &Action::SkipComment));
    assert_eq!(session.current_screen(), Some(ScreenRef::Summary));
    session
}
