// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::month_bounds;
use crate::models::User;
use crate::store::groups;
use anyhow::Result;
use rusqlite::{Connection, params};
use std::collections::HashMap;

/// Members of a shared group, for the inclusion-toggle list.
pub fn resolve_members(conn: &Connection, group_id: i64) -> Result<Vec<User>> {
    groups::members(conn, group_id)
}

/// Per-member personal spending for a month: absolute sums of negative
/// amounts over rows with no group reference. A member's contribution to the
/// shared ledger never counts here, even though they authored it.
pub fn personal_expenses(
    conn: &Connection,
    month: &str,
    member_ids: &[i64],
) -> Result<HashMap<i64, i64>> {
    let (from, to) = month_bounds(month)?;
    let mut stmt = conn.prepare(
        "SELECT COALESCE(SUM(-amount), 0) FROM transactions
         WHERE user_id = ?1 AND group_id IS NULL AND amount < 0
           AND date >= ?2 AND date < ?3",
    )?;
    let mut out = HashMap::new();
    for uid in member_ids {
        let total: i64 = stmt.query_row(params![uid, from, to], |r| r.get(0))?;
        out.insert(*uid, total);
    }
    Ok(out)
}
