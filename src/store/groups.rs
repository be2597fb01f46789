// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{SharedGroup, User};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

/// Shared groups the user belongs to.
pub fn for_user(conn: &Connection, user_id: i64) -> Result<Vec<SharedGroup>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name FROM shared_groups g
         JOIN shared_group_members m ON m.group_id = g.id
         WHERE m.user_id = ?1 ORDER BY g.id ASC",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(SharedGroup {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn create(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO shared_groups(name) VALUES (?1)", params![name])
        .with_context(|| format!("Create shared group '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn add_members(conn: &Connection, group_id: i64, user_ids: &[i64]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO shared_group_members(user_id, group_id) VALUES (?1, ?2)",
    )?;
    for uid in user_ids {
        stmt.execute(params![uid, group_id])
            .with_context(|| format!("Add user {} to group {}", uid, group_id))?;
    }
    Ok(())
}

pub fn members(conn: &Connection, group_id: i64) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username FROM users u
         JOIN shared_group_members m ON m.user_id = u.id
         WHERE m.group_id = ?1 ORDER BY u.id ASC",
    )?;
    let rows = stmt.query_map(params![group_id], |r| {
        Ok(User {
            id: r.get(0)?,
            username: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
