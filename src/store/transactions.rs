// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::parse_date;
use crate::models::{Scope, Transaction};
use crate::store::categories::{self, DELETED_CATEGORY_LABEL};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use serde::Serialize;

/// Ledger entry to insert; `source` is set only by the reconciler.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub date: chrono::NaiveDate,
    pub amount: i64,
    pub category: &'a str,
    pub memo: Option<&'a str>,
    pub source: Option<&'a str>,
}

/// Value-based identity the UI edits/deletes by, mirroring what the user can
/// see on screen. The row id stays the real identity.
#[derive(Debug, Clone)]
pub struct MatchCriteria<'a> {
    pub date: &'a str,
    pub amount: i64,
    pub category: &'a str,
    pub memo: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Patch<'a> {
    pub amount: i64,
    pub memo: Option<&'a str>,
}

/// Display row with the category join resolved; `is_deleted` flags a
/// soft-deleted or missing category.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub amount: i64,
    pub category: String,
    pub category_name: String,
    pub is_deleted: bool,
    pub memo: Option<String>,
}

pub fn insert(conn: &Connection, scope: Scope, tx: &NewTransaction) -> Result<()> {
    let (user_id, group_id) = scope.ids();
    conn.execute(
        "INSERT INTO transactions(date, amount, category, memo, user_id, group_id, source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            tx.date.to_string(),
            tx.amount,
            tx.category,
            tx.memo,
            user_id,
            group_id,
            tx.source
        ],
    )
    .with_context(|| format!("Insert transaction on {}", tx.date))?;
    Ok(())
}

/// Transactions for a scope, optionally restricted to a half-open
/// `[from, to)` date range, oldest first.
pub fn list(
    conn: &Connection,
    scope: Scope,
    range: Option<(&str, &str)>,
) -> Result<Vec<Transaction>> {
    let (pred, id) = scope.filter("?1");
    let mut sql = format!(
        "SELECT id, date, amount, category, memo, source FROM transactions WHERE {pred}"
    );
    if range.is_some() {
        sql.push_str(" AND date >= ?2 AND date < ?3");
    }
    sql.push_str(" ORDER BY date ASC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match range {
        Some((from, to)) => stmt.query(params![id, from, to])?,
        None => stmt.query(params![id])?,
    };
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(1)?;
        out.push(Transaction {
            id: r.get(0)?,
            date: parse_date(&date)?,
            amount: r.get(2)?,
            category: r.get(3)?,
            memo: r.get(4)?,
            source: r.get(5)?,
        });
    }
    Ok(out)
}

/// Full display listing with category names resolved, most recent first
/// (date, then insertion time as the tie-breaker).
pub fn list_with_categories(conn: &Connection, scope: Scope) -> Result<Vec<TransactionRow>> {
    let names = categories::name_map(conn, scope)?;
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "SELECT id, date, amount, category, memo FROM transactions WHERE {pred}
         ORDER BY date DESC, created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (tx_id, date, amount, category, memo) = row?;
        let (category_name, is_deleted) = match names.get(&category) {
            Some((name, deleted)) => (name.clone(), *deleted),
            None => (DELETED_CATEGORY_LABEL.to_string(), true),
        };
        out.push(TransactionRow {
            id: tx_id,
            date,
            amount,
            category,
            category_name,
            is_deleted,
            memo,
        });
    }
    Ok(out)
}

/// Patch amount/memo on the row(s) matching the on-screen values.
pub fn update_matched(
    conn: &Connection,
    scope: Scope,
    criteria: &MatchCriteria,
    patch: &Patch,
) -> Result<usize> {
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "UPDATE transactions SET amount = ?2, memo = ?3
         WHERE date = ?4 AND amount = ?5 AND category = ?6 AND memo IS ?7 AND {pred}"
    );
    let n = conn
        .execute(
            &sql,
            params![
                id,
                patch.amount,
                patch.memo,
                criteria.date,
                criteria.amount,
                criteria.category,
                criteria.memo
            ],
        )
        .with_context(|| format!("Update transaction on {}", criteria.date))?;
    Ok(n)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])
        .with_context(|| format!("Delete transaction {}", id))?;
    Ok(())
}
