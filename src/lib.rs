// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod calendar;
pub mod db;
pub mod error;
pub mod members;
pub mod models;
pub mod notify;
pub mod reconcile;
pub mod store;
pub mod summary;
