//! Search, filter and sort over an in-memory bug collection.

use crate::model::{BugRecord, Priority, Status};

/// Secondary ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// `LOW` first, `CRITICAL` last.
    Priority,
    /// `NEW` first, `CLOSED` last.
    Status,
}

impl SortKey {
    /// Case-insensitive parse; unrecognized text means no sorting.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("priority") {
            Some(Self::Priority)
        } else if text.eq_ignore_ascii_case("status") {
            Some(Self::Status)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Status => "status",
        }
    }
}

/// Filter and sort options for [`search`]. Every predicate left as `None`
/// is inactive; active predicates are ANDed.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring of title or description.
    /// Ignored when blank.
    pub keyword: Option<String>,
    /// Exact status.
    pub status: Option<Status>,
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Case-insensitive substring of the assignee. Ignored when blank.
    pub assignee: Option<String>,
    pub sort: Option<SortKey>,
}

/// Filter and order `records` without modifying them.
///
/// With no sort key the input order is kept. Sorting is stable.
#[must_use]
pub fn search<'a>(records: &'a [BugRecord], query: &SearchQuery) -> Vec<&'a BugRecord> {
    let keyword = active_text(query.keyword.as_deref());
    let assignee = active_text(query.assignee.as_deref());

    let mut results: Vec<&BugRecord> = records
        .iter()
        .filter(|record| {
            keyword.as_deref().is_none_or(|kw| {
                record.title.to_lowercase().contains(kw)
                    || record.description.to_lowercase().contains(kw)
            })
        })
        .filter(|record| query.status.is_none_or(|status| record.status == status))
        .filter(|record| {
            query
                .priority
                .is_none_or(|priority| record.priority == priority)
        })
        .filter(|record| {
            assignee
                .as_deref()
                .is_none_or(|name| record.assigned_to.to_lowercase().contains(name))
        })
        .collect();

    sort_records(&mut results, query.sort);
    results
}

/// Lower-cased needle, or `None` when the text is absent or blank.
fn active_text(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty()).map(str::to_lowercase)
}

fn sort_records(records: &mut [&BugRecord], sort: Option<SortKey>) {
    match sort {
        Some(SortKey::Priority) => records.sort_by_key(|record| record.priority),
        Some(SortKey::Status) => records.sort_by_key(|record| record.status),
        None => {}
    }
}
