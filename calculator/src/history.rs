use std::collections::VecDeque;

use chrono::{DateTime, Local};
use interpreter::Number;
use itertools::Itertools;

use crate::OperationKind;

/// Most entries kept; older ones are dropped first.
pub const HISTORY_CAPACITY: usize = 50;
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    timestamp: DateTime<Local>,
    expression: String,
    result: Number,
    kind: OperationKind,
}

impl HistoryEntry {
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// `DD/MM/YYYY HH:MM:SS`
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn result(&self) -> &Number {
        &self.result
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, expression: impl Into<String>, result: Number, kind: OperationKind) {
        self.entries.push_back(HistoryEntry {
            timestamp: Local::now(),
            expression: expression.into(),
            result,
            kind,
        });
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
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

    /// Owned copy in insertion order.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn most_recent_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Entries per kind, most frequent first. Equal counts are ordered by kind name.
    pub fn counts_by_kind(&self) -> Vec<(OperationKind, usize)> {
        self.entries
            .iter()
            .map(HistoryEntry::kind)
            .counts()
            .into_iter()
            .sorted_by(|(a, a_count), (b, b_count)| {
                b_count.cmp(a_count).then_with(|| a.name().cmp(b.name()))
            })
            .collect()
    }
}
