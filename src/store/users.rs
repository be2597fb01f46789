// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn list(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, username FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], |r| {
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

pub fn insert(conn: &Connection, username: &str) -> Result<i64> {
    conn.execute("INSERT INTO users(username) VALUES (?1)", params![username])
        .with_context(|| format!("Insert user '{}'", username))?;
    Ok(conn.last_insert_rowid())
}
