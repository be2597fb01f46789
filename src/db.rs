// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("io.homeledger", "Homeledger", "homeledger"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("homeledger.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

/// Open (and initialize) a database at an explicit path.
pub fn open_at(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS shared_groups(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS shared_group_members(
        user_id INTEGER NOT NULL,
        group_id INTEGER NOT NULL,
        UNIQUE(user_id, group_id),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(group_id) REFERENCES shared_groups(id) ON DELETE CASCADE
    );

    -- Categories are soft-deleted only: historical transactions keep
    -- referencing the code after is_deleted flips.
    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL,
        description TEXT NOT NULL,
        sort INTEGER NOT NULL DEFAULT 0,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        is_shared_total INTEGER NOT NULL DEFAULT 0,
        user_id INTEGER,
        group_id INTEGER
    );
    -- NULLs compare distinct under UNIQUE, so per-scope uniqueness needs
    -- partial indexes instead of a plain UNIQUE(code, user_id, group_id).
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_user
        ON categories(code, user_id) WHERE user_id IS NOT NULL;
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_group
        ON categories(code, group_id) WHERE group_id IS NOT NULL;

    -- category is a weak reference on purpose; no FK.
    -- source stamps auto-posted rows: 'fixed_cost:<id>:<YYYY-MM>'.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount INTEGER NOT NULL,
        category TEXT NOT NULL,
        memo TEXT,
        user_id INTEGER,
        group_id INTEGER,
        source TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS monthly_budget(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        month TEXT NOT NULL,
        budget INTEGER NOT NULL CHECK(budget >= 0),
        user_id INTEGER,
        group_id INTEGER
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_budget_user
        ON monthly_budget(month, user_id) WHERE user_id IS NOT NULL;
    CREATE UNIQUE INDEX IF NOT EXISTS idx_budget_group
        ON monthly_budget(month, group_id) WHERE group_id IS NOT NULL;

    CREATE TABLE IF NOT EXISTS fixed_costs(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount > 0),
        memo TEXT,
        day INTEGER NOT NULL CHECK(day BETWEEN 1 AND 31),
        active INTEGER NOT NULL DEFAULT 1,
        user_id INTEGER,
        group_id INTEGER
    );
    "#,
    )?;
    Ok(())
}
