// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-cost auto-posting. Runs on every scope activation, decides whether
//! each active fixed cost already has its due occurrence posted, and inserts
//! the missing ones exactly once.

use crate::calendar::{self, occurrence_date, prev_month};
use crate::models::{FixedCost, Scope, Transaction};
use crate::notify::Notification;
use crate::store::categories::{self, DELETED_CATEGORY_LABEL};
use crate::store::{fixed_costs, transactions};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Stamp carried by auto-posted rows. Matching on it keeps reconciliation
/// idempotent even after a user edits the row's memo or amount.
pub fn source_stamp(fixed_cost_id: i64, month: &str) -> String {
    format!("fixed_cost:{}:{}", fixed_cost_id, month)
}

/// Generation counter for scope activations. Each activation invalidates
/// tokens handed out for earlier scopes, so a reconciliation pass that
/// finishes after the user navigated away discards its results.
#[derive(Debug, Default, Clone)]
pub struct ScopeWatch {
    generation: Arc<AtomicU64>,
}

impl ScopeWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call on every scope change; the returned token belongs to the new
    /// scope and stays current until the next activation.
    pub fn activate(&self) -> ScopeToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        ScopeToken {
            generation,
            watch: Arc::clone(&self.generation),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScopeToken {
    generation: u64,
    watch: Arc<AtomicU64>,
}

impl ScopeToken {
    pub fn is_stale(&self) -> bool {
        self.watch.load(Ordering::SeqCst) != self.generation
    }
}

/// A fixed cost the pass just posted, with the occurrence date it landed on.
#[derive(Debug, Clone)]
pub struct PostedFixedCost {
    pub fixed: FixedCost,
    pub date: NaiveDate,
}

/// Reconcile a scope against the current business day.
pub fn run(conn: &rusqlite::Connection, scope: Scope, token: &ScopeToken) -> Result<Vec<PostedFixedCost>> {
    run_at(conn, scope, calendar::today(), token)
}

/// Reconcile against an explicit "today" (deterministic entry point).
///
/// The transaction snapshot is taken once, before any insert: a row posted
/// by this pass must never be mistaken for a pre-existing occurrence of a
/// different fixed cost.
pub fn run_at(
    conn: &rusqlite::Connection,
    scope: Scope,
    today: NaiveDate,
    token: &ScopeToken,
) -> Result<Vec<PostedFixedCost>> {
    let month = today.format("%Y-%m").to_string();
    let prev = prev_month(&month)?;

    let defs = fixed_costs::list(conn, scope)?;
    let (from, _) = calendar::month_bounds(&prev)?;
    let (_, to) = calendar::month_bounds(&month)?;
    let snapshot = transactions::list(conn, scope, Some((&from, &to)))?;

    let mut posted = Vec::new();
    for fixed in defs.into_iter().filter(|f| f.active) {
        if !(1..=31).contains(&fixed.day) || fixed.amount <= 0 {
            warn!(id = fixed.id, day = fixed.day, amount = fixed.amount,
                "skipping malformed fixed-cost definition");
            continue;
        }
        // Before the due day the current month's occurrence cannot exist
        // yet; catch up on the previous month instead. The comparison uses
        // the clamped due day so a day-31 cost is due on Apr 30, not in May.
        let due_day = occurrence_date(&month, fixed.day)?.day();
        let target_month = if today.day() < due_day { &prev } else { &month };
        match post_if_missing(conn, scope, &fixed, target_month, &snapshot) {
            Ok(Some(date)) => posted.push(PostedFixedCost { fixed, date }),
            Ok(None) => {}
            Err(err) => {
                // One failed insert must not starve the remaining costs.
                warn!(id = fixed.id, category = %fixed.category, error = %err,
                    "fixed-cost insert failed, continuing");
            }
        }
    }

    if token.is_stale() {
        // Inserts are durable regardless; only the report is dropped so the
        // UI never announces postings for a scope the user left.
        info!(scope = ?scope, "scope changed mid-reconciliation, discarding results");
        return Ok(Vec::new());
    }
    if !posted.is_empty() {
        info!(scope = ?scope, count = posted.len(), "auto-posted fixed costs");
    }
    Ok(posted)
}

/// One queue message per posted cost, with the category description
/// resolved for display.
pub fn notifications_for(
    conn: &rusqlite::Connection,
    scope: Scope,
    posted: &[PostedFixedCost],
) -> Result<Vec<Notification>> {
    let names = categories::name_map(conn, scope)?;
    Ok(posted
        .iter()
        .map(|p| {
            let name = names
                .get(&p.fixed.category)
                .map(|(n, _)| n.as_str())
                .unwrap_or(DELETED_CATEGORY_LABEL);
            Notification::for_posted(&p.fixed, name)
        })
        .collect())
}

fn post_if_missing(
    conn: &rusqlite::Connection,
    scope: Scope,
    fixed: &FixedCost,
    month: &str,
    snapshot: &[Transaction],
) -> Result<Option<NaiveDate>> {
    let due = occurrence_date(month, fixed.day)?;
    let stamp = source_stamp(fixed.id, month);
    if snapshot.iter().any(|tx| already_posted(tx, fixed, due, &stamp)) {
        debug!(id = fixed.id, month, "occurrence already posted");
        return Ok(None);
    }
    transactions::insert(
        conn,
        scope,
        &transactions::NewTransaction {
            date: due,
            amount: -fixed.amount,
            category: &fixed.category,
            memo: fixed.memo.as_deref(),
            source: Some(&stamp),
        },
    )?;
    Ok(Some(due))
}

/// An occurrence exists if a row carries this occurrence's stamp, or if it
/// matches the original value key (category, |amount|, memo, exact date).
/// The value match covers rows predating the stamp and manual entries.
fn already_posted(tx: &Transaction, fixed: &FixedCost, due: NaiveDate, stamp: &str) -> bool {
    if tx.source.as_deref() == Some(stamp) {
        return true;
    }
    tx.category == fixed.category
        && tx.amount.abs() == fixed.amount.abs()
        && tx.memo.as_deref() == fixed.memo.as_deref()
        && tx.date == due
}
