// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transient user-facing messages, one at a time: each queued message shows
//! for a fixed duration, then a short gap passes before the next begins.
//! Session-only; nothing here survives a reload. The postings the messages
//! describe are durably stored either way.

use crate::models::FixedCost;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const SHOW_DURATION: Duration = Duration::from_secs(2);
pub const DISMISS_GAP: Duration = Duration::from_millis(500);

const MEMO_PREVIEW_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    /// Message for one auto-posted fixed cost: day, category description,
    /// memo preview, amount.
    pub fn for_posted(fixed: &FixedCost, category_name: &str) -> Self {
        let memo_part = match fixed.memo.as_deref() {
            Some(memo) if !memo.is_empty() => format!(" (memo: {})", truncate_memo(memo)),
            _ => String::new(),
        };
        Notification {
            message: format!(
                "Posted '{}' for day {}{}: {} recorded",
                category_name, fixed.day, memo_part, fixed.amount
            ),
        }
    }
}

fn truncate_memo(memo: &str) -> String {
    let mut chars = memo.chars();
    let preview: String = chars.by_ref().take(MEMO_PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{}…", preview)
    } else {
        preview
    }
}

#[derive(Debug)]
enum DisplayState {
    Idle,
    Showing { since: Instant },
    Gap { since: Instant },
}

/// FIFO queue with a timer-driven display state machine:
/// `queued → showing (2s) → gap (0.5s) → removed`. Single-producer,
/// single-consumer within one UI session; `push` never blocks.
#[derive(Debug)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
    state: DisplayState,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        NotificationQueue {
            pending: VecDeque::new(),
            state: DisplayState::Idle,
        }
    }

    pub fn push(&mut self, n: Notification) {
        self.pending.push_back(n);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Notification>) {
        self.pending.extend(items);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && matches!(self.state, DisplayState::Idle)
    }

    /// The message currently on screen, if any. At most one at any instant.
    pub fn current(&self) -> Option<&Notification> {
        match self.state {
            DisplayState::Showing { .. } => self.pending.front(),
            _ => None,
        }
    }

    /// Advance the state machine to `now`. Call from the UI tick; the queue
    /// drains itself, no user action dismisses anything.
    pub fn tick(&mut self, now: Instant) {
        loop {
            match self.state {
                DisplayState::Idle => {
                    if self.pending.is_empty() {
                        return;
                    }
                    self.state = DisplayState::Showing { since: now };
                    return;
                }
                DisplayState::Showing { since } => {
                    if now.duration_since(since) < SHOW_DURATION {
                        return;
                    }
                    self.state = DisplayState::Gap {
                        since: since + SHOW_DURATION,
                    };
                }
                DisplayState::Gap { since } => {
                    if now.duration_since(since) < DISMISS_GAP {
                        return;
                    }
                    self.pending.pop_front();
                    self.state = DisplayState::Idle;
                }
            }
        }
    }
}
