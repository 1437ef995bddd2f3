mod common;

use anyhow::Result;

use shawarma_bot::action::{Action, CartAction};
use shawarma_bot::catalog::{Catalog, Category};
use shawarma_bot::dialogue::{Awaiting, DeliveryMethod, ScreenRef, Session};
use shawarma_bot::pricing::{format_summary, price_session};
use shawarma_bot::wizard::{Outcome, Wizard};

use common::{order_items, payloads, pick_in_current_select, session_at_home, session_at_summary, shown, FixedCounter};

fn snapshot(session: &Session) -> serde_json::Value {
    serde_json::to_value(session).expect("session serializes")
}

#[tokio::test]
async fn test_pickup_order_of_three_mains() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);

    let mut session = session_at_summary(&wizard);
    assert_eq!(session.basket_quantity(Category::Mains, "koko"), 3);

    // Re-render the summary through back navigation to read its text
    shown(wizard.handle_action(&mut session, &Action::Back));
    let summary = shown(wizard.handle_action(&mut session, &Action::SkipComment));

    assert!(summary.text.starts_with("Номер замовлення: T20240101-0001"));
    assert!(summary.text.contains("Шаурма Коко — 3 шт"));
    assert!(summary.text.contains("Отримання: Самовивіз"));
    assert!(summary.text.contains("Телефон: +38 (067) - 123 - 45 - 67"));
    assert!(summary.text.contains("Ціна: 780 грн"));
    assert!(!summary.text.contains("Адреса"));
    assert!(!summary.text.contains("Коментар"));
    assert!(payloads(&summary).contains(&"order:confirm".to_string()));

    assert_eq!(wizard.handle_action(&mut session, &Action::Confirm), Outcome::Confirm);
    Ok(())
}

#[tokio::test]
async fn test_delivery_flow_collects_address_and_comment() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);

    let mut session = Session::default();
    let first = wizard.start(&mut session);
    assert_eq!(payloads(&first), vec!["ship:delivery", "ship:pickup"]);

    let address_screen = shown(wizard.handle_action(&mut session, &Action::Ship(DeliveryMethod::Delivery)));
    assert_eq!(session.awaiting, Some(Awaiting::Address));
    assert_eq!(payloads(&address_screen), vec!["nav:back"]);

    match wizard.handle_text(&mut session, "  вул. Хрещатик, 1  ") {
        Outcome::Show { view, notice } => {
            assert!(view.request_contact);
            assert_eq!(notice.as_deref(), Some("Адресу збережено ✅"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(session.address.as_deref(), Some("вул. Хрещатик, 1"));
    assert_eq!(session.current_screen(), Some(ScreenRef::PhoneSelection));

    shown(wizard.handle_action(&mut session, &Action::PhoneManual));
    assert_eq!(session.current_screen(), Some(ScreenRef::PhoneEntry));
    shown(wizard.handle_text(&mut session, "+380 67 123 45 67"));

    order_items(&wizard, &mut session, Category::Desserts, &[("brownie", 2)]);
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));

    shown(wizard.handle_action(&mut session, &Action::Cart(CartAction::Open)));
    let comment_screen = shown(wizard.handle_action(&mut session, &Action::Cart(CartAction::Checkout)));
    assert_eq!(session.awaiting, Some(Awaiting::Comment));
    assert!(payloads(&comment_screen).contains(&"comment:skip".to_string()));

    let summary = match wizard.handle_text(&mut session, "без цибулі") {
        Outcome::Show { view, notice } => {
            assert_eq!(notice.as_deref(), Some("Коментар додано ✅"));
            view
        }
        other => panic!("unexpected outcome {other:?}"),
    };
    assert!(summary.text.contains("Десерт Брауні — 2 шт"));
    assert!(summary.text.contains("Отримання: Доставка"));
    assert!(summary.text.contains("Адреса: вул. Хрещатик, 1"));
    assert!(summary.text.contains("Коментар: без цибулі"));
    assert!(summary.text.contains("Ціна: 260 грн"));
    assert_eq!(session.awaiting, None);
    Ok(())
}

#[tokio::test]
async fn test_toggle_is_exclusive_or() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Mains)));
    for id in ["koko", "disney", "koko"] {
        wizard.handle_action(&mut session, &Action::Toggle(Category::Mains, id.to_string()));
    }

    let selected: Vec<&str> = session
        .category(Category::Mains)
        .map(|state| state.selected.iter().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(selected, vec!["disney"]);
    assert_eq!(session.current_screen(), Some(ScreenRef::Select(Category::Mains)));

    // Labels follow the selection
    let view = match wizard.handle_action(&mut session, &Action::Toggle(Category::Mains, "koko".to_string())) {
        Outcome::Keyboard(view) => view,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(view.keyboard[0][0].label, "☑ Коко — 260 грн");
    assert_eq!(view.keyboard[1][0].label, "☑ Дісней — 160 грн");

    // Unknown ids do not enter the selection
    let outcome = wizard.handle_action(&mut session, &Action::Toggle(Category::Mains, "falafel".to_string()));
    assert_eq!(outcome, Outcome::Ignored);
    Ok(())
}

#[tokio::test]
async fn test_continue_without_selection_changes_nothing() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Desserts)));
    let before = snapshot(&session);

    let outcome = wizard.handle_action(&mut session, &Action::Continue(Category::Desserts));
    assert_eq!(outcome, Outcome::Notice("Виберіть хоча б одну позицію.".to_string()));
    assert_eq!(snapshot(&session), before);
    assert!(session.basket_is_empty());
    Ok(())
}

#[tokio::test]
async fn test_quantity_prompts_follow_menu_order_and_accumulate() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Sides)));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Sides, "falafel".to_string()));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Sides, "dips".to_string()));

    let first = shown(wizard.handle_action(&mut session, &Action::Continue(Category::Sides)));
    assert_eq!(first.text, "Скільки «Діпи»?");
    assert_eq!(first.keyboard.len(), 4);
    assert_eq!(payloads(&first)[0], "sides:qty:dips:1");
    assert_eq!(payloads(&first)[8], "sides:qty:dips:9");

    let second = shown(wizard.handle_action(&mut session, &Action::Quantity(Category::Sides, "dips".to_string(), 2)));
    assert_eq!(second.text, "Скільки «Фалафель»?");
    assert_eq!(session.current_screen(), Some(ScreenRef::Qty(Category::Sides, 1)));

    // A press from the earlier prompt is stale
    let stale = wizard.handle_action(&mut session, &Action::Quantity(Category::Sides, "dips".to_string(), 4));
    assert_eq!(stale, Outcome::Ignored);
    assert_eq!(session.basket_quantity(Category::Sides, "dips"), 2);

    shown(wizard.handle_action(&mut session, &Action::Quantity(Category::Sides, "falafel".to_string(), 1)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));

    // Second pass starts with an empty selection and adds to the basket
    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Sides)));
    assert!(session.category(Category::Sides).is_some_and(|state| state.selected.is_empty()));
    pick_in_current_select(&wizard, &mut session, Category::Sides, &[("dips", 3)]);

    assert_eq!(session.basket_quantity(Category::Sides, "dips"), 5);
    assert_eq!(session.basket_quantity(Category::Sides, "falafel"), 1);
    Ok(())
}

#[tokio::test]
async fn test_addons_follow_mains() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    order_items(&wizard, &mut session, Category::Mains, &[("disney", 1)]);
    assert_eq!(session.current_screen(), Some(ScreenRef::AddonPrompt));

    let select = shown(wizard.handle_action(&mut session, &Action::Addons(true)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Select(Category::Addons)));
    assert!(payloads(&select).contains(&"addons:toggle:onion".to_string()));

    wizard.handle_action(&mut session, &Action::Toggle(Category::Addons, "onion".to_string()));
    let prompt = shown(wizard.handle_action(&mut session, &Action::Continue(Category::Addons)));
    assert_eq!(prompt.text, "Скільки порцій «Цибуля»?");

    shown(wizard.handle_action(&mut session, &Action::Quantity(Category::Addons, "onion".to_string(), 2)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Comment));

    let summary = shown(wizard.handle_action(&mut session, &Action::SkipComment));
    assert!(summary.text.contains("Додатки:"));
    assert!(summary.text.contains("Цибуля — 2 пор."));
    assert!(summary.text.contains("Ціна: 180 грн"));

    // Add-ons are not reachable from the home menu
    shown(wizard.handle_action(&mut session, &Action::Home));
    assert_eq!(wizard.handle_action(&mut session, &Action::Browse(Category::Addons)), Outcome::Ignored);
    Ok(())
}

#[tokio::test]
async fn test_back_navigation_rebuilds_quantity_prompt() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Mains)));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Mains, "koko".to_string()));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Mains, "disney".to_string()));
    shown(wizard.handle_action(&mut session, &Action::Continue(Category::Mains)));
    shown(wizard.handle_action(&mut session, &Action::Quantity(Category::Mains, "koko".to_string(), 1)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Qty(Category::Mains, 1)));

    let back = shown(wizard.handle_action(&mut session, &Action::Back));
    assert_eq!(back.text, "Скільки «Коко»?");
    assert_eq!(session.current_screen(), Some(ScreenRef::Qty(Category::Mains, 0)));
    assert_eq!(session.category(Category::Mains).map(|state| state.cursor), Some(0));

    // The rebuilt prompt accepts its item again
    shown(wizard.handle_action(&mut session, &Action::Quantity(Category::Mains, "koko".to_string(), 2)));
    assert_eq!(session.basket_quantity(Category::Mains, "koko"), 3);

    for _ in 0..12 {
        wizard.go_back(&mut session);
    }
    assert_eq!(session.history, vec![ScreenRef::Delivery]);
    assert_eq!(session.awaiting, None);
    Ok(())
}

/// Press Back until the wizard can go no further
fn back_to_start(wizard: &Wizard<'_>, session: &mut Session) {
    for _ in 0..40 {
        let view = wizard.go_back(session);
        assert!(!view.text.is_empty());
    }
}

#[tokio::test]
async fn test_back_after_reentering_category_reaches_delivery() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    order_items(&wizard, &mut session, Category::Sides, &[("dips", 1)]);
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));
    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Sides)));
    assert!(!session.history.contains(&ScreenRef::Qty(Category::Sides, 0)));

    shown(wizard.handle_action(&mut session, &Action::Back));
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);
    assert_eq!(session.basket_quantity(Category::Sides, "dips"), 1);

    // A prompt whose queue is gone is skipped rather than rebuilt
    let mut session = session_at_home(&wizard);
    session.history.push(ScreenRef::Qty(Category::Drinks, 2));
    session.history.push(ScreenRef::Cart);
    wizard.go_back(&mut session);
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);
    Ok(())
}

#[tokio::test]
async fn test_back_navigation_always_reaches_delivery() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);

    // Cart
    let mut session = session_at_home(&wizard);
    order_items(&wizard, &mut session, Category::Mains, &[("koko", 1)]);
    shown(wizard.handle_action(&mut session, &Action::Addons(false)));
    shown(wizard.handle_action(&mut session, &Action::Home));
    shown(wizard.handle_action(&mut session, &Action::Cart(CartAction::Open)));
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);

    // Add-on quantity prompt
    let mut session = session_at_home(&wizard);
    order_items(&wizard, &mut session, Category::Mains, &[("koko", 2)]);
    shown(wizard.handle_action(&mut session, &Action::Addons(true)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Select(Category::Addons)));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Addons, "onion".to_string()));
    shown(wizard.handle_action(&mut session, &Action::Continue(Category::Addons)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Qty(Category::Addons, 0)));
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);

    // Repeated passes through mains, add-ons and drinks
    let mut session = session_at_home(&wizard);
    order_items(&wizard, &mut session, Category::Mains, &[("koko", 1), ("disney", 1)]);
    shown(wizard.handle_action(&mut session, &Action::Addons(true)));
    pick_in_current_select(&wizard, &mut session, Category::Addons, &[("onion", 1), ("mozz", 1)]);
    shown(wizard.handle_action(&mut session, &Action::Home));
    order_items(&wizard, &mut session, Category::Mains, &[("disney", 2)]);
    shown(wizard.handle_action(&mut session, &Action::Addons(true)));
    pick_in_current_select(&wizard, &mut session, Category::Addons, &[("mozz", 1)]);
    shown(wizard.handle_action(&mut session, &Action::Home));
    order_items(&wizard, &mut session, Category::Drinks, &[("cola", 1), ("capp", 1)]);
    order_items(&wizard, &mut session, Category::Drinks, &[("ayran", 1)]);
    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Drinks)));
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);
    assert_eq!(session.basket_quantity(Category::Mains, "disney"), 3);
    assert_eq!(session.basket_quantity(Category::Addons, "mozz"), 2);
    assert_eq!(session.basket_quantity(Category::Drinks, "ayran"), 1);

    // Summary
    let mut session = session_at_summary(&wizard);
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);

    // Delivery customer stopped halfway through a quantity queue
    let mut session = Session::default();
    wizard.start(&mut session);
    shown(wizard.handle_action(&mut session, &Action::Ship(DeliveryMethod::Delivery)));
    shown(wizard.handle_text(&mut session, "вул. Хрещатик, 1"));
    shown(wizard.handle_text(&mut session, "0671234567"));
    shown(wizard.handle_action(&mut session, &Action::Browse(Category::Desserts)));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Desserts, "carrot".to_string()));
    wizard.handle_action(&mut session, &Action::Toggle(Category::Desserts, "brownie".to_string()));
    shown(wizard.handle_action(&mut session, &Action::Continue(Category::Desserts)));
    shown(wizard.handle_action(&mut session, &Action::Quantity(Category::Desserts, "carrot".to_string(), 1)));
    assert_eq!(session.current_screen(), Some(ScreenRef::Qty(Category::Desserts, 1)));
    back_to_start(&wizard, &mut session);
    assert_eq!(session.history, vec![ScreenRef::Delivery]);
    assert_eq!(session.awaiting, None);
    Ok(())
}

#[tokio::test]
async fn test_order_number_is_assigned_once() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_summary(&wizard);

    for _ in 0..3 {
        shown(wizard.handle_action(&mut session, &Action::Back));
        let summary = shown(wizard.handle_action(&mut session, &Action::SkipComment));
        assert!(summary.text.starts_with("Номер замовлення: T20240101-0001"));
    }

    assert_eq!(counter.calls(), 1);
    assert_eq!(session.order_number.as_deref(), Some("T20240101-0001"));
    Ok(())
}

#[tokio::test]
async fn test_phone_is_masked_or_rejected() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);

    let mut session = Session::default();
    wizard.start(&mut session);
    shown(wizard.handle_action(&mut session, &Action::Ship(DeliveryMethod::Pickup)));
    let before = snapshot(&session);

    let outcome = wizard.handle_text(&mut session, "12345");
    assert_eq!(
        outcome,
        Outcome::Notice("Некоректний номер. Приклад: +380671234567 або 0671234567.".to_string())
    );
    assert_eq!(snapshot(&session), before);

    match wizard.handle_contact(&mut session, "380671234567") {
        Outcome::Show { notice, .. } => {
            assert_eq!(notice.as_deref(), Some("Телефон збережено: +38 (067) - 123 - 45 - 67"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(session.phone.as_deref(), Some("+38 (067) - 123 - 45 - 67"));
    assert_eq!(session.current_screen(), Some(ScreenRef::Home));

    // Nothing is waiting for a contact any more
    assert_eq!(wizard.handle_contact(&mut session, "0501234567"), Outcome::Ignored);
    Ok(())
}

#[tokio::test]
async fn test_stale_and_unknown_events_are_ignored() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);
    let before = snapshot(&session);

    for payload in ["garbage", "nav:nowhere", "drinks:qty:cola:0", ""] {
        let action = Action::parse(payload);
        assert_eq!(wizard.handle_action(&mut session, &action), Outcome::Ignored);
    }
    assert_eq!(wizard.handle_action(&mut session, &Action::Ship(DeliveryMethod::Delivery)), Outcome::Ignored);
    assert_eq!(
        wizard.handle_action(&mut session, &Action::Quantity(Category::Drinks, "cola".to_string(), 2)),
        Outcome::Ignored
    );
    assert_eq!(wizard.handle_action(&mut session, &Action::Confirm), Outcome::Ignored);
    assert_eq!(wizard.handle_text(&mut session, "привіт"), Outcome::Fallback);

    assert_eq!(snapshot(&session), before);
    Ok(())
}

#[tokio::test]
async fn test_menu_needs_contact_details() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);

    let mut session = Session::default();
    wizard.start(&mut session);
    assert_eq!(wizard.handle_action(&mut session, &Action::Home), Outcome::Ignored);
    assert_eq!(wizard.handle_action(&mut session, &Action::Browse(Category::Mains)), Outcome::Ignored);
    assert_eq!(wizard.handle_action(&mut session, &Action::Cart(CartAction::Open)), Outcome::Ignored);
    Ok(())
}

#[tokio::test]
async fn test_cart_lists_and_clears_basket() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    let empty_cart = shown(wizard.handle_action(&mut session, &Action::Cart(CartAction::Open)));
    assert!(empty_cart.text.contains("(Порожньо)"));
    assert!(!payloads(&empty_cart).contains(&"cart:checkout".to_string()));
    assert_eq!(
        wizard.handle_action(&mut session, &Action::Cart(CartAction::Checkout)),
        Outcome::Notice("Кошик порожній.".to_string())
    );

    shown(wizard.handle_action(&mut session, &Action::Home));
    order_items(&wizard, &mut session, Category::Drinks, &[("cola", 2), ("capp", 1)]);

    let cart = shown(wizard.handle_action(&mut session, &Action::Cart(CartAction::Open)));
    assert!(cart.text.contains("Напої"));
    assert!(cart.text.contains("Кола — 2 шт — 140 грн"));
    assert!(cart.text.contains("Капучино — 1 шт — 120 грн"));
    assert!(cart.text.contains("Ціна: 260 грн"));
    assert!(payloads(&cart).contains(&"cart:checkout".to_string()));

    match wizard.handle_action(&mut session, &Action::Cart(CartAction::Clear)) {
        Outcome::Show { view, notice } => {
            assert_eq!(notice.as_deref(), Some("Кошик очищено 🗑️"));
            assert!(view.text.contains("(Порожньо)"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(session.basket_is_empty());
    Ok(())
}

#[tokio::test]
async fn test_restart_discards_session() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_summary(&wizard);

    shown(wizard.handle_action(&mut session, &Action::Restart));
    assert_eq!(session.history, vec![ScreenRef::Delivery]);
    assert!(session.basket_is_empty());
    assert!(session.phone.is_none());
    assert!(session.order_number.is_none());
    Ok(())
}

#[tokio::test]
async fn test_delivery_method_does_not_change_total() -> Result<()> {
    let catalog = Catalog::standard();
    let counter = FixedCounter::default();
    let wizard = Wizard::new(&catalog, &counter);
    let mut session = session_at_home(&wizard);

    order_items(&wizard, &mut session, Category::Drinks, &[("ayran", 2)]);
    order_items(&wizard, &mut session, Category::Mains, &[("koko", 1), ("disney", 2)]);
    shown(wizard.handle_action(&mut session, &Action::Addons(true)));
    pick_in_current_select(&wizard, &mut session, Category::Addons, &[("mozz", 3)]);

    let pickup = price_session(&session, &catalog);
    assert_eq!(pickup.total, 2 * 95 + 260 + 2 * 160 + 3 * 20);

    session.delivery_method = Some(DeliveryMethod::Delivery);
    session.address = Some("вул. Січових Стрільців, 5".to_string());
    let delivery = price_session(&session, &catalog);
    assert_eq!(delivery, pickup);

    let order_number = session.order_number.clone().unwrap_or_default();
    assert!(format_summary(&session, &catalog, &order_number).contains("Адреса: вул. Січових Стрільців, 5"));
    session.delivery_method = Some(DeliveryMethod::Pickup);
    assert!(!format_summary(&session, &catalog, &order_number).contains("Адреса"));
    Ok(())
}
