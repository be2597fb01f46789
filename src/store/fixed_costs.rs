// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::models::{FixedCost, Scope};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

fn validate(amount: i64, day: u32) -> Result<()> {
    if amount <= 0 {
        return Err(LedgerError::validation("amount", "must be positive").into());
    }
    if !(1..=31).contains(&day) {
        return Err(LedgerError::validation("day", format!("{} is not in 1..=31", day)).into());
    }
    Ok(())
}

/// All fixed-cost definitions for a scope, inactive ones included: the
/// settings screen shows both, the reconciler skips inactive itself.
pub fn list(conn: &Connection, scope: Scope) -> Result<Vec<FixedCost>> {
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "SELECT id, category, amount, memo, day, active FROM fixed_costs WHERE {pred} ORDER BY day ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |r| {
        Ok(FixedCost {
            id: r.get(0)?,
            category: r.get(1)?,
            amount: r.get(2)?,
            memo: r.get(3)?,
            day: r.get(4)?,
            active: r.get(5)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn insert(
    conn: &Connection,
    scope: Scope,
    category: &str,
    amount: i64,
    memo: Option<&str>,
    day: u32,
) -> Result<i64> {
    validate(amount, day)?;
    let (user_id, group_id) = scope.ids();
    conn.execute(
        "INSERT INTO fixed_costs(category, amount, memo, day, user_id, group_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![category, amount, memo, day, user_id, group_id],
    )
    .with_context(|| format!("Insert fixed cost for '{}'", category))?;
    Ok(conn.last_insert_rowid())
}

pub fn update(
    conn: &Connection,
    scope: Scope,
    id: i64,
    category: &str,
    amount: i64,
    memo: Option<&str>,
    day: u32,
    active: bool,
) -> Result<()> {
    validate(amount, day)?;
    let (pred, scope_id) = scope.filter("?1");
    let sql = format!(
        "UPDATE fixed_costs SET category = ?2, amount = ?3, memo = ?4, day = ?5, active = ?6
         WHERE id = ?7 AND {pred}"
    );
    conn.execute(
        &sql,
        params![scope_id, category, amount, memo, day, active, id],
    )
    .with_context(|| format!("Update fixed cost {}", id))?;
    Ok(())
}

pub fn delete(conn: &Connection, scope: Scope, id: i64) -> Result<()> {
    let (pred, scope_id) = scope.filter("?1");
    let sql = format!("DELETE FROM fixed_costs WHERE id = ?2 AND {pred}");
    conn.execute(&sql, params![scope_id, id])
        .with_context(|| format!("Delete fixed cost {}", id))?;
    Ok(())
}
