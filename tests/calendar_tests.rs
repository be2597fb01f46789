// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::calendar;
use homeledger::db;
use homeledger::error::LedgerError;
use homeledger::models::Scope;

#[test]
fn month_arithmetic_rolls_over_year_boundaries() {
    assert_eq!(calendar::next_month("2025-12").unwrap(), "2026-01");
    assert_eq!(calendar::next_month("2025-08").unwrap(), "2025-09");
    assert_eq!(calendar::prev_month("2026-01").unwrap(), "2025-12");
    assert_eq!(calendar::prev_month("2025-03").unwrap(), "2025-02");
}

#[test]
fn month_bounds_are_half_open() {
    let (from, to) = calendar::month_bounds("2025-12").unwrap();
    assert_eq!(from, "2025-12-01");
    assert_eq!(to, "2026-01-01");
}

#[test]
fn invalid_months_are_rejected() {
    assert!(calendar::parse_month("2025-13").is_err());
    assert!(calendar::parse_month("202508").is_err());
    assert!(calendar::next_month("nope").is_err());
}

#[test]
fn occurrence_clamps_to_month_end() {
    assert_eq!(
        calendar::occurrence_date("2025-02", 31).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
    );
    assert_eq!(
        calendar::occurrence_date("2024-02", 30).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(
        calendar::occurrence_date("2025-08", 15).unwrap(),
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    );
    assert!(calendar::occurrence_date("2025-08", 0).is_err());
}

#[test]
fn month_last_day_handles_leap_years() {
    assert_eq!(
        calendar::month_last_day("2024-02").unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(
        calendar::month_last_day("2025-04").unwrap(),
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
    );
}

#[test]
fn scope_constructor_requires_exactly_one_id() {
    assert_eq!(Scope::new(Some(1), None).unwrap(), Scope::User(1));
    assert_eq!(Scope::new(None, Some(2)).unwrap(), Scope::Group(2));
    assert_eq!(Scope::new(None, None).unwrap_err(), LedgerError::Scope);
    assert_eq!(Scope::new(Some(1), Some(2)).unwrap_err(), LedgerError::Scope);
}

#[test]
fn open_at_initializes_schema_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let conn = db::open_at(&path).unwrap();
    // Reopening must be idempotent.
    drop(conn);
    let conn = db::open_at(&path).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}
