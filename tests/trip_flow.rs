mod common;

use std::fs;

use chrono::NaiveDate;
use trip_planner::{
    core::{AssumeNo, AssumeYes, Outcome},
    currency::ExchangeRate,
    domain::{Amount, ExpenseForm, ItineraryCategory, ItineraryEntry, PaymentMethod, ShoppingItem},
    errors::TripError,
    ledger::SaveKind,
    transfer::{parse_import, read_import, write_export},
};

fn ymd(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

#[test]
fn fresh_home_starts_with_five_empty_days() {
    let base = common::setup_test_home();
    let manager = common::open_manager(&base);
    let dates: Vec<NaiveDate> = manager.dates().iter().map(|entry| entry.date()).collect();
    assert_eq!(dates, (20..=24).map(|d| ymd(2, d)).collect::<Vec<_>>());
    assert!(manager.current_itinerary().is_empty());
}

#[test]
fn changes_are_written_through_and_reloaded() {
    let base = common::setup_test_home();
    {
        let mut manager = common::open_manager(&base);
        manager.select(ymd(2, 21)).unwrap();
        manager
            .add_entry(
                ItineraryEntry::new(0, "Fushimi Inari", "07:30")
                    .with_category(ItineraryCategory::Sightseeing),
            )
            .unwrap();
        manager.prepend_day().unwrap();
        manager
            .add_shopping_item(ShoppingItem::new("Tokyo Banana"))
            .unwrap();
        let mut form = manager.new_expense_form();
        form.amount = Amount::from(2400);
        form.name = "Okonomiyaki".into();
        manager.save_expense(form).unwrap();
    }

    let reloaded = common::open_manager(&base);
    assert_eq!(reloaded.dates().first().map(|d| d.date()), Some(ymd(2, 19)));
    assert_eq!(reloaded.dates().len(), 6);
    assert_eq!(reloaded.range().book().day(ymd(2, 21))[0].name, "Fushimi Inari");
    assert_eq!(reloaded.shopping().items()[0].name, "Tokyo Banana");
    assert_eq!(reloaded.expenses().records()[0].name, "Okonomiyaki");

    let itinerary = fs::read_to_string(common::store_dir(&base).join("trip_itinerary_v2.json")).unwrap();
    assert!(itinerary.contains("\"2026-02-19\""));
    assert!(itinerary.contains("景點"));
}

#[test]
fn corrupt_store_file_falls_back_to_defaults() {
    let base = common::setup_test_home();
    fs::create_dir_all(common::store_dir(&base)).unwrap();
    fs::write(common::store_dir(&base).join("trip_expenses_v1.json"), "{not json").unwrap();
    fs::write(
        common::store_dir(&base).join("trip_shopping_v1.json"),
        r#"[{"name":"Hello Kitty towel"}]"#,
    )
    .unwrap();

    let manager = common::open_manager(&base);
    assert!(manager.expenses().is_empty());
    assert_eq!(manager.shopping().len(), 1);
}

#[test]
fn unreadable_records_are_skipped_and_the_rest_survive() {
    let base = common::setup_test_home();
    let store = common::store_dir(&base);
    fs::create_dir_all(&store).unwrap();
    fs::write(
        store.join("trip_expenses_v1.json"),
        r#"[{"id":2,"date":"","name":"Ramen","amount":"1200"},
            {"id":"oops","amount":5},
            {"id":1,"date":"2026-02-20","name":"Tea","amount":300}]"#,
    )
    .unwrap();
    fs::write(
        store.join("trip_itinerary_v2.json"),
        r#"{"2026-02-21":[{"id":3,"name":"Kaiyukan"},{"name":"no id"}],"someday":[]}"#,
    )
    .unwrap();

    let mut manager = common::open_manager(&base);
    let names: Vec<&str> = manager
        .expenses()
        .records()
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ramen", "Tea"]);
    assert_eq!(manager.expenses().records()[0].date, None);
    assert_eq!(manager.dates().len(), 1);
    assert_eq!(manager.current_itinerary()[0].name, "Kaiyukan");

    let mut form = manager.new_expense_form();
    form.amount = Amount::from(800);
    manager.save_expense(form).unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.join("trip_expenses_v1.json")).unwrap())
            .unwrap();
    let records = stored.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["name"], "Ramen");
    assert_eq!(records[1]["date"], "");
    assert_eq!(records[2]["date"], "2026-02-20");
}

#[test]
fn expense_edits_keep_id_and_position() {
    let base = common::setup_test_home();
    let mut manager = common::open_manager(&base);
    let mut ids = Vec::new();
    for amount in [100, 200, 300] {
        let mut form = manager.new_expense_form();
        form.amount = Amount::from(amount);
        match manager.save_expense(form).unwrap() {
            SaveKind::Created(id) => ids.push(id),
            other => panic!("unexpected {other:?}"),
        }
    }
    let middle = ids[1];
    let mut form = ExpenseForm::edit(manager.expenses().find(middle).unwrap());
    form.amount = Amount::from("250");
    assert_eq!(manager.save_expense(form).unwrap(), SaveKind::Updated(middle));

    let order: Vec<i64> = manager.expenses().records().iter().map(|r| r.id).collect();
    assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
    assert_eq!(manager.expenses().find(middle).unwrap().amount.whole_units(), 250);
}

#[test]
fn switching_to_twd_downgrades_the_rewards_card() {
    let base = common::setup_test_home();
    let manager = common::open_manager(&base);
    let mut form = manager.new_expense_form();
    form.payment = PaymentMethod::RewardsCard;
    assert!(form.set_currency(trip_planner::currency::Currency::Twd));
    assert_eq!(form.payment, PaymentMethod::CreditCard);
}

#[test]
fn rewards_follow_the_rate_and_cap() {
    let base = common::setup_test_home();
    let mut manager = common::open_manager(&base);
    let mut form = manager.new_expense_form();
    form.amount = Amount::from(100_000);
    form.payment = PaymentMethod::RewardsCard;
    manager.save_expense(form).unwrap();

    manager.set_rate(ExchangeRate::new(0.22).unwrap());
    let stats = manager.rewards();
    assert_eq!(stats.spent_twd, 22330);
    assert_eq!(stats.base_reward, 223);
    assert_eq!(stats.bonus_reward, 600);
    assert_eq!(stats.total_reward, 823);
    assert_eq!(stats.progress_percent, 100);
}

#[test]
fn guarded_deletes_respect_the_answer() {
    let base = common::setup_test_home();
    let mut manager = common::open_manager(&base);
    manager.add_shopping_item(ShoppingItem::new("Uji matcha")).unwrap();

    assert_eq!(
        manager.remove_shopping_item(0, &AssumeNo).unwrap(),
        Outcome::Declined
    );
    assert_eq!(manager.shopping().len(), 1);
    assert!(manager.remove_shopping_item(0, &AssumeYes).unwrap().is_applied());
    assert!(matches!(
        manager.remove_shopping_item(0, &AssumeYes),
        Err(TripError::ShoppingIndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn export_then_import_restores_every_store() {
    let base = common::setup_test_home();
    let backup = base.join("backup.json");
    {
        let mut manager = common::open_manager(&base);
        manager
            .add_entry(ItineraryEntry::new(0, "Nara Park", "10:00"))
            .unwrap();
        manager.add_shopping_item(ShoppingItem::new("Daruma")).unwrap();
        write_export(&backup, &manager.export_document()).unwrap();
    }

    let other = common::setup_test_home();
    let mut manager = common::open_manager(&other);
    let payload = read_import(&backup).unwrap();
    assert_eq!(payload.sections(), vec!["itinerary", "shopping", "expenses"]);
    manager.import(payload, &AssumeYes).unwrap();

    assert_eq!(manager.dates().len(), 5);
    assert_eq!(manager.current_itinerary()[0].name, "Nara Park");
    assert_eq!(manager.shopping().items()[0].name, "Daruma");
    assert!(manager.expenses().is_empty());

    let reloaded = common::open_manager(&other);
    assert_eq!(reloaded.shopping().len(), 1);
}

#[test]
fn malformed_import_leaves_state_untouched() {
    let base = common::setup_test_home();
    let mut manager = common::open_manager(&base);
    manager.add_shopping_item(ShoppingItem::new("Senbei")).unwrap();
    assert!(matches!(
        parse_import(r#"{"shopping": [{"image": "data:x"}]"#),
        Err(TripError::MalformedImport(_))
    ));
    assert_eq!(manager.shopping().len(), 1);
}
