// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::parse_month;
use crate::error::LedgerError;
use crate::models::Scope;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

/// Budget for (month, scope); absent row reads as `None`, which callers
/// treat as zero.
pub fn get(conn: &Connection, scope: Scope, month: &str) -> Result<Option<i64>> {
    let month = parse_month(month)?;
    let (pred, id) = scope.filter("?1");
    let sql = format!("SELECT budget FROM monthly_budget WHERE month = ?2 AND {pred}");
    let v: Option<i64> = conn
        .query_row(&sql, params![id, month], |r| r.get(0))
        .optional()?;
    Ok(v)
}

/// Upsert on (month, scope).
pub fn upsert(conn: &Connection, scope: Scope, month: &str, budget: i64) -> Result<()> {
    let month = parse_month(month)?;
    if budget < 0 {
        return Err(LedgerError::validation("budget", "must be non-negative").into());
    }
    let (pred, id) = scope.filter("?1");
    let sql = format!("UPDATE monthly_budget SET budget = ?2 WHERE month = ?3 AND {pred}");
    let updated = conn.execute(&sql, params![id, budget, month])?;
    if updated == 0 {
        let (user_id, group_id) = scope.ids();
        conn.execute(
            "INSERT INTO monthly_budget(month, budget, user_id, group_id) VALUES (?1, ?2, ?3, ?4)",
            params![month, budget, user_id, group_id],
        )?;
    }
    Ok(())
}
