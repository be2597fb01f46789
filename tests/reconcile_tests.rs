// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::db;
use homeledger::models::Scope;
use homeledger::reconcile::{self, ScopeWatch};
use homeledger::store::{fixed_costs, transactions};
use rusqlite::Connection;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn posts_current_month_when_due_day_has_passed() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, None, 20).unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2025-08-25"), &token).unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].date, date("2025-08-20"));

    let txs = transactions::list(&conn, scope, None).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, -700_000);
    assert_eq!(txs[0].date, date("2025-08-20"));
    assert_eq!(
        txs[0].source.as_deref(),
        Some(reconcile::source_stamp(posted[0].fixed.id, "2025-08").as_str())
    );
}

#[test]
fn posts_previous_month_before_due_day() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, None, 20).unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2025-08-15"), &token).unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].date, date("2025-07-20"));

    // Only the previous month's candidate is considered; nothing lands in
    // August yet.
    let txs = transactions::list(&conn, scope, None).unwrap();
    assert_eq!(txs.len(), 1);
}

#[test]
fn second_run_inserts_nothing() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, Some("apartment"), 10).unwrap();
    fixed_costs::insert(&conn, scope, "internet", 35_000, None, 5).unwrap();

    let watch = ScopeWatch::new();
    let first = reconcile::run_at(&conn, scope, date("2025-08-25"), &watch.activate()).unwrap();
    assert_eq!(first.len(), 2);

    let second = reconcile::run_at(&conn, scope, date("2025-08-25"), &watch.activate()).unwrap();
    assert!(second.is_empty());
    assert_eq!(transactions::list(&conn, scope, None).unwrap().len(), 2);
}

#[test]
fn stamp_survives_memo_and_amount_edits() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, Some("apartment"), 10).unwrap();

    let watch = ScopeWatch::new();
    reconcile::run_at(&conn, scope, date("2025-08-25"), &watch.activate()).unwrap();

    // User edits the auto-posted row: value key no longer matches.
    conn.execute(
        "UPDATE transactions SET memo = 'apartment + parking', amount = -720000",
        [],
    )
    .unwrap();

    let again = reconcile::run_at(&conn, scope, date("2025-08-26"), &watch.activate()).unwrap();
    assert!(again.is_empty());
    assert_eq!(transactions::list(&conn, scope, None).unwrap().len(), 1);
}

#[test]
fn manual_entry_matching_value_key_suppresses_post() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, Some("apartment"), 10).unwrap();

    // The user typed the rent in by hand before reconciliation ran.
    transactions::insert(
        &conn,
        scope,
        &transactions::NewTransaction {
            date: date("2025-08-10"),
            amount: -700_000,
            category: "rent",
            memo: Some("apartment"),
            source: None,
        },
    )
    .unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2025-08-25"), &token).unwrap();
    assert!(posted.is_empty());
    assert_eq!(transactions::list(&conn, scope, None).unwrap().len(), 1);
}

#[test]
fn inactive_definitions_are_skipped() {
    let conn = setup();
    let scope = Scope::User(1);
    let id = fixed_costs::insert(&conn, scope, "gym", 60_000, None, 1).unwrap();
    fixed_costs::update(&conn, scope, id, "gym", 60_000, None, 1, false).unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2025-08-25"), &token).unwrap();
    assert!(posted.is_empty());
}

#[test]
fn day_over_month_length_clamps_to_last_day() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "savings", 100_000, None, 31).unwrap();

    // March 5th, day 31 not reached: the February occurrence is due, and
    // February has no 31st.
    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2026-03-05"), &token).unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].date, date("2026-02-28"));
}

#[test]
fn clamped_day_is_due_on_the_months_last_day() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "savings", 100_000, None, 31).unwrap();

    // April 30th: day 31 clamps to the 30th, so the April occurrence is
    // already due today, not a May catch-up.
    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2026-04-30"), &token).unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].date, date("2026-04-30"));
}

#[test]
fn year_rollover_catches_up_in_december() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, None, 20).unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2026-01-10"), &token).unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].date, date("2025-12-20"));
}

#[test]
fn stale_token_discards_results_but_keeps_inserts() {
    let conn = setup();
    let scope = Scope::User(1);
    fixed_costs::insert(&conn, scope, "rent", 700_000, None, 10).unwrap();

    let watch = ScopeWatch::new();
    let token = watch.activate();
    // The user navigates to another scope before the pass completes.
    let _newer = watch.activate();

    let posted = reconcile::run_at(&conn, scope, date("2025-08-25"), &token).unwrap();
    assert!(posted.is_empty());
    // The write itself is durable, only the report is dropped.
    assert_eq!(transactions::list(&conn, scope, None).unwrap().len(), 1);
}

#[test]
fn group_scope_reconciles_independently_of_members() {
    let conn = setup();
    fixed_costs::insert(&conn, Scope::Group(4), "utilities", 90_000, None, 5).unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, Scope::Group(4), date("2025-08-25"), &token).unwrap();
    assert_eq!(posted.len(), 1);

    assert!(transactions::list(&conn, Scope::User(1), None)
        .unwrap()
        .is_empty());
    assert_eq!(
        transactions::list(&conn, Scope::Group(4), None).unwrap().len(),
        1
    );
}

#[test]
fn posted_costs_map_to_one_notification_each() {
    let conn = setup();
    let scope = Scope::User(1);
    homeledger::store::categories::insert(&conn, scope, "rent", "Rent").unwrap();
    fixed_costs::insert(&conn, scope, "rent", 700_000, None, 10).unwrap();
    fixed_costs::insert(&conn, scope, "phantom", 5_000, None, 3).unwrap();

    let token = ScopeWatch::new().activate();
    let posted = reconcile::run_at(&conn, scope, date("2025-08-25"), &token).unwrap();
    assert_eq!(posted.len(), 2);

    let notes = reconcile::notifications_for(&conn, scope, &posted).unwrap();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().any(|n| n.message.contains("Rent")));
    // Unknown category code still produces a message, with the placeholder.
    assert!(notes.iter().any(|n| n.message.contains("deleted category")));
}

#[test]
fn definition_validation_rejects_bad_day_and_amount() {
    let conn = setup();
    let scope = Scope::User(1);
    assert!(fixed_costs::insert(&conn, scope, "x", 0, None, 10).is_err());
    assert!(fixed_costs::insert(&conn, scope, "x", -5, None, 10).is_err());
    assert!(fixed_costs::insert(&conn, scope, "x", 100, None, 0).is_err());
    assert!(fixed_costs::insert(&conn, scope, "x", 100, None, 32).is_err());
}
