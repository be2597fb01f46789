// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::models::{Category, Scope};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

/// Placeholder name for transactions whose category code is soft-deleted or
/// was never (re)created in this scope.
pub const DELETED_CATEGORY_LABEL: &str = "deleted category";

/// Active categories for a scope, input-form order (sort ascending).
pub fn list(conn: &Connection, scope: Scope) -> Result<Vec<Category>> {
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "SELECT code, description, sort, is_deleted, is_shared_total
         FROM categories WHERE is_deleted = 0 AND {pred} ORDER BY sort ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |r| {
        Ok(Category {
            code: r.get(0)?,
            description: r.get(1)?,
            sort: r.get(2)?,
            is_deleted: r.get(3)?,
            is_shared_total: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Insert a category at the end of the current ordering (max sort + 1).
///
/// Codes are unique per scope. Re-using a soft-deleted code revives that
/// row, so its historical transactions resolve to the new description; an
/// active duplicate is a `Validation` error.
pub fn insert(conn: &Connection, scope: Scope, code: &str, description: &str) -> Result<()> {
    let (pred, id) = scope.filter("?1");
    let sql = format!("SELECT id, is_deleted FROM categories WHERE code = ?2 AND {pred}");
    let existing: Option<(i64, bool)> = conn
        .query_row(&sql, params![id, code], |r| Ok((r.get(0)?, r.get(1)?)))
        .optional()?;
    if let Some((_, false)) = existing {
        return Err(LedgerError::validation("code", format!("'{}' already exists", code)).into());
    }

    let sql = format!("SELECT MAX(sort) FROM categories WHERE is_deleted = 0 AND {pred}");
    let max_sort: Option<i64> = conn
        .query_row(&sql, params![id], |r| r.get(0))
        .optional()?
        .flatten();
    let next_sort = max_sort.map(|s| s + 1).unwrap_or(0);

    if let Some((row_id, true)) = existing {
        conn.execute(
            "UPDATE categories SET description = ?1, sort = ?2, is_deleted = 0 WHERE id = ?3",
            params![description, next_sort, row_id],
        )
        .with_context(|| format!("Revive category '{}'", code))?;
        return Ok(());
    }

    let (user_id, group_id) = scope.ids();
    conn.execute(
        "INSERT INTO categories(code, description, sort, user_id, group_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![code, description, next_sort, user_id, group_id],
    )
    .with_context(|| format!("Insert category '{}'", code))?;
    Ok(())
}

/// Soft delete: the code stays resolvable for historical rows.
pub fn soft_delete(conn: &Connection, scope: Scope, code: &str) -> Result<()> {
    let (pred, id) = scope.filter("?1");
    let sql = format!("UPDATE categories SET is_deleted = 1 WHERE code = ?2 AND {pred}");
    conn.execute(&sql, params![id, code])
        .with_context(|| format!("Soft-delete category '{}'", code))?;
    Ok(())
}

pub fn update(
    conn: &Connection,
    scope: Scope,
    code: &str,
    description: &str,
    is_shared_total: bool,
) -> Result<()> {
    let (pred, id) = scope.filter("?1");
    let sql = format!(
        "UPDATE categories SET description = ?2, is_shared_total = ?3 WHERE code = ?4 AND {pred}"
    );
    conn.execute(&sql, params![id, description, is_shared_total, code])
        .with_context(|| format!("Update category '{}'", code))?;
    Ok(())
}

/// Persist a new display ordering after a drag-and-drop pass.
pub fn reorder(conn: &Connection, scope: Scope, order: &[(String, i64)]) -> Result<()> {
    let (pred, id) = scope.filter("?1");
    let sql = format!("UPDATE categories SET sort = ?2 WHERE code = ?3 AND {pred}");
    let mut stmt = conn.prepare(&sql)?;
    for (code, sort) in order {
        stmt.execute(params![id, sort, code])
            .with_context(|| format!("Reorder category '{}'", code))?;
    }
    Ok(())
}

/// code -> (description, is_deleted), including soft-deleted rows, for
/// joining historical transactions.
pub fn name_map(conn: &Connection, scope: Scope) -> Result<HashMap<String, (String, bool)>> {
    let (pred, id) = scope.filter("?1");
    let sql = format!("SELECT code, description, is_deleted FROM categories WHERE {pred}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, bool>(2)?,
        ))
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let (code, description, is_deleted) = row?;
        map.insert(code, (description, is_deleted));
    }
    Ok(map)
}
