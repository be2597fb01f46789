// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{FixedOffset, NaiveDate, Utc};

/// The household runs on a single fixed clock offset (+9h). Every "today"
/// default and every month boundary must come through here so stored dates
/// and aggregation windows never disagree near midnight.
pub const BUSINESS_UTC_OFFSET_HOURS: i32 = 9;

pub fn today() -> NaiveDate {
    match FixedOffset::east_opt(BUSINESS_UTC_OFFSET_HOURS * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

/// Current business month as `YYYY-MM`.
pub fn current_month() -> String {
    today().format("%Y-%m").to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Validates a `YYYY-MM` month string and hands back its canonical
/// zero-padded form. Stored dates compare lexicographically, so an unpadded
/// month like `2025-8` must never leak into a range bound or a budget key.
pub fn parse_month(s: &str) -> Result<String> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(d.format("%Y-%m").to_string())
}

fn split_month(month: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = month.split('-').collect();
    if parts.len() != 2 {
        return Err(anyhow!("Invalid month '{}'", month));
    }
    let y: i32 = parts[0]
        .parse()
        .with_context(|| format!("Invalid year in '{}'", month))?;
    let m: u32 = parts[1]
        .parse()
        .with_context(|| format!("Invalid month number in '{}'", month))?;
    if !(1..=12).contains(&m) {
        return Err(anyhow!("Invalid month number {}", m));
    }
    Ok((y, m))
}

pub fn next_month(month: &str) -> Result<String> {
    let (y, m) = split_month(month)?;
    let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
    Ok(format!("{:04}-{:02}", ny, nm))
}

pub fn prev_month(month: &str) -> Result<String> {
    let (y, m) = split_month(month)?;
    let (py, pm) = if m == 1 { (y - 1, 12) } else { (y, m - 1) };
    Ok(format!("{:04}-{:02}", py, pm))
}

/// Half-open range for a month: `[month-01, nextMonth-01)`, as ISO strings
/// ready for lexicographic comparison in SQL.
pub fn month_bounds(month: &str) -> Result<(String, String)> {
    let m = parse_month(month)?;
    let next = next_month(&m)?;
    Ok((format!("{}-01", m), format!("{}-01", next)))
}

pub fn month_last_day(month: &str) -> Result<NaiveDate> {
    let (y, m) = split_month(month)?;
    let last = match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(y, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => return Err(anyhow!("Invalid month number {}", m)),
    };
    NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| anyhow!("Invalid month '{}'", month))
}

/// Due date of a day-of-month occurrence within `month`. Day 29-31 in a
/// shorter month clamps to the month's last day.
pub fn occurrence_date(month: &str, day: u32) -> Result<NaiveDate> {
    let (y, m) = split_month(month)?;
    if !(1..=31).contains(&day) {
        return Err(anyhow!("Invalid day-of-month {}", day));
    }
    match NaiveDate::from_ymd_opt(y, m, day) {
        Some(d) => Ok(d),
        None => month_last_day(month),
    }
}
