// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ownership context of a query: an individual user's personal ledger or a
/// shared group's pooled ledger, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    User(i64),
    Group(i64),
}

impl Scope {
    /// Boundary constructor for callers arriving with two optionals.
    pub fn new(user_id: Option<i64>, group_id: Option<i64>) -> Result<Self, LedgerError> {
        match (user_id, group_id) {
            (Some(u), None) => Ok(Scope::User(u)),
            (None, Some(g)) => Ok(Scope::Group(g)),
            _ => Err(LedgerError::Scope),
        }
    }

    /// SQL predicate over the scoped table plus the id to bind for it.
    /// User scope is strictly personal: rows posted to a group never match.
    pub fn filter(&self, param: &str) -> (String, i64) {
        match self {
            Scope::User(id) => (format!("user_id = {param} AND group_id IS NULL"), *id),
            Scope::Group(id) => (format!("group_id = {param}"), *id),
        }
    }

    /// (user_id, group_id) pair for INSERT column values.
    pub fn ids(&self) -> (Option<i64>, Option<i64>) {
        match self {
            Scope::User(id) => (Some(*id), None),
            Scope::Group(id) => (None, Some(*id)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedGroup {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub description: String,
    pub sort: i64,
    pub is_deleted: bool,
    pub is_shared_total: bool,
}

/// Ledger entry. Negative amount = expense, positive = income.
/// `category` is a weak reference: it may point at a soft-deleted or absent
/// category code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: i64,
    pub category: String,
    pub memo: Option<String>,
    pub source: Option<String>,
}

/// Recurring monthly obligation, consumed read-only by the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: i64,
    pub category: String,
    pub amount: i64,
    pub memo: Option<String>,
    pub day: u32,
    pub active: bool,
}
