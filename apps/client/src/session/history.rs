//! Append-only, capacity-bounded session history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

/// Default number of retained entries; older lines are dropped.
pub const DEFAULT_HISTORY_CAP: usize = 200;

/// One human-readable history line with its wall-clock timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: OffsetDateTime,
    pub message: String,
}

impl HistoryEntry {
    /// `HH:MM:SS: message`, the shape the presentation layer renders.
    pub fn display_line(&self) -> String {
        let fmt = format_description!("[hour]:[minute]:[second]");
        match self.at.format(&fmt) {
            Ok(ts) => format!("{ts}: {}", self.message),
            Err(_) => self.message.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    cap: usize,
}

impl HistoryLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap.min(64)),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            at: OffsetDateTime::now_utc(),
            message: message.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}
