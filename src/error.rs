// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Typed failures the caller is expected to branch on. Everything else
/// (storage errors in particular) travels as a contexted `anyhow::Error`.
///
/// A missing budget row or category is never an error: absent budget reads
/// as zero, absent category renders as a placeholder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Exactly one of user id / group id must be given.
    #[error("scope requires exactly one of user or group")]
    Scope,

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl LedgerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
