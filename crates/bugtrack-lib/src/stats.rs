//! Read-only aggregate counts over a bug collection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{BugRecord, Priority, Status};

/// Aggregate statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    /// Bugs that are neither resolved nor closed.
    pub open: usize,
    /// Only statuses that occur are present.
    pub by_status: BTreeMap<Status, usize>,
    /// Only priorities that occur are present.
    pub by_priority: BTreeMap<Priority, usize>,
    /// Keyed by lower-cased assignee name.
    pub by_assignee: BTreeMap<String, usize>,
}

impl Statistics {
    #[must_use]
    pub fn from_records(records: &[BugRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            if record.status.is_open() {
                stats.open += 1;
            }
            *stats.by_status.entry(record.status).or_default() += 1;
            *stats.by_priority.entry(record.priority).or_default() += 1;
            *stats
                .by_assignee
                .entry(record.assigned_to.to_lowercase())
                .or_default() += 1;
        }

        stats
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
