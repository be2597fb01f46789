// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::{current_month, month_bounds, parse_month, prev_month};
use crate::members;
use crate::models::Scope;
use crate::store::categories::{self, DELETED_CATEGORY_LABEL};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub budget: i64,
    pub spent: i64,
}

/// One category's expense total for a month (or all time). `is_deleted`
/// flags a soft-deleted or missing category; the row is still reported.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub name: String,
    pub total: i64,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupNet {
    pub total_income: i64,
    pub group_spent: i64,
    pub included_personal_expense: i64,
    pub adjusted_spent: i64,
    pub net_income: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub category: String,
    pub name: String,
    pub total: i64,
}

/// Budget versus spending for one scope and month. A missing budget row
/// reads as zero; income rows never count toward `spent`.
pub fn monthly_summary(conn: &Connection, scope: Scope, month: &str) -> Result<MonthlySummary> {
    let month = parse_month(month)?;
    let budget = crate::store::budgets::get(conn, scope, &month)?.unwrap_or(0);
    let spent = spent_in_month(conn, scope, &month)?;
    Ok(MonthlySummary {
        month,
        budget,
        spent,
    })
}

fn spent_in_month(conn: &Connection, scope: Scope, month: &str) -> Result<i64> {
    let (from, to) = month_bounds(month)?;
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "SELECT COALESCE(SUM(-amount), 0) FROM transactions
         WHERE {pred} AND amount < 0 AND date >= ?2 AND date < ?3"
    );
    let spent: i64 = conn.query_row(&sql, params![id, from, to], |r| r.get(0))?;
    Ok(spent)
}

fn income_in_month(conn: &Connection, scope: Scope, month: &str) -> Result<i64> {
    let (from, to) = month_bounds(month)?;
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions
         WHERE {pred} AND amount > 0 AND date >= ?2 AND date < ?3"
    );
    let income: i64 = conn.query_row(&sql, params![id, from, to], |r| r.get(0))?;
    Ok(income)
}

/// Expense totals per category for a month, absolute values, with names
/// resolved against the (possibly soft-deleted) category table. Unsorted;
/// display layers sort by total descending.
pub fn category_breakdown(conn: &Connection, scope: Scope, month: &str) -> Result<Vec<CategoryTotal>> {
    let (from, to) = month_bounds(month)?;
    let names = categories::name_map(conn, scope)?;
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "SELECT category, SUM(-amount) FROM transactions
         WHERE {pred} AND amount < 0 AND date >= ?2 AND date < ?3
         GROUP BY category"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id, from, to], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (code, total) = row?;
        let (name, is_deleted) = resolve_name(&names, &code);
        out.push(CategoryTotal {
            category: code,
            name,
            total,
            is_deleted,
        });
    }
    Ok(out)
}

fn resolve_name(names: &HashMap<String, (String, bool)>, code: &str) -> (String, bool) {
    match names.get(code) {
        Some((name, deleted)) => (name.clone(), *deleted),
        None => (DELETED_CATEGORY_LABEL.to_string(), true),
    }
}

/// Combined household picture for a shared group and month.
///
/// `excluded_members` is the per-session toggle state: ids listed there are
/// left out of the personal-expense add-on. Empty set = everyone included.
pub fn group_net(
    conn: &Connection,
    group_id: i64,
    month: &str,
    excluded_members: &HashSet<i64>,
) -> Result<GroupNet> {
    let scope = Scope::Group(group_id);
    let total_income = income_in_month(conn, scope, month)?;
    let group_spent = spent_in_month(conn, scope, month)?;

    let member_ids: Vec<i64> = members::resolve_members(conn, group_id)?
        .into_iter()
        .map(|u| u.id)
        .collect();
    let personal = members::personal_expenses(conn, month, &member_ids)?;
    let included_personal_expense: i64 = personal
        .iter()
        .filter(|(uid, _)| !excluded_members.contains(uid))
        .map(|(_, total)| *total)
        .sum();

    let adjusted_spent = group_spent + included_personal_expense;
    Ok(GroupNet {
        total_income,
        group_spent,
        included_personal_expense,
        adjusted_spent,
        net_income: total_income - adjusted_spent,
    })
}

/// Net figures display with an explicit sign, no clamping: "+220000", "-5000".
pub fn signed_amount(n: i64) -> String {
    if n < 0 {
        format!("{}", n)
    } else {
        format!("+{}", n)
    }
}

/// Per-category expense totals for the trailing `months` months ending at
/// the current business month, oldest month first. Feeds the spending-trend
/// chart.
pub fn monthly_trend(conn: &Connection, scope: Scope, months: usize) -> Result<Vec<TrendPoint>> {
    monthly_trend_ending(conn, scope, &current_month(), months)
}

pub fn monthly_trend_ending(
    conn: &Connection,
    scope: Scope,
    ending_month: &str,
    months: usize,
) -> Result<Vec<TrendPoint>> {
    let mut window = Vec::with_capacity(months);
    let mut m = parse_month(ending_month)?;
    for _ in 0..months {
        window.push(m.clone());
        m = prev_month(&m)?;
    }
    window.reverse();

    let mut out = Vec::new();
    for month in &window {
        for total in category_breakdown(conn, scope, month)? {
            out.push(TrendPoint {
                month: month.clone(),
                category: total.category,
                name: total.name,
                total: total.total,
            });
        }
    }
    Ok(out)
}

/// All-time accumulated totals for a group's shared-total categories (the
/// cross-member "accumulated view" tab). Sums are signed: refunds and
/// income offsets reduce the accumulated figure.
pub fn shared_accumulated(conn: &Connection, group_id: i64) -> Result<Vec<CategoryTotal>> {
    let scope = Scope::Group(group_id);
    let names = categories::name_map(conn, scope)?;
    let shared: HashSet<String> = {
        let mut stmt = conn.prepare(
            "SELECT code FROM categories WHERE group_id = ?1 AND is_shared_total = 1",
        )?;
        stmt.query_map(params![group_id], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<_>>()?
    };

    let mut stmt = conn.prepare(
        "SELECT category, SUM(amount) FROM transactions WHERE group_id = ?1 GROUP BY category",
    )?;
    let rows = stmt.query_map(params![group_id], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (code, total) = row?;
        if !shared.contains(&code) {
            continue;
        }
        let (name, is_deleted) = resolve_name(&names, &code);
        out.push(CategoryTotal {
            category: code,
            name,
            total,
            is_deleted,
        });
    }
    Ok(out)
}
