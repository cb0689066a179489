//! Core data types for bugtrack-lib.
//!
//! `Status` and `Priority` are closed enumerations whose declaration order
//! is their sort order. Text that names no variant is coerced to the
//! documented default (`NEW` / `LOW`) by the lenient entry points, while
//! `lookup` and `FromStr` report the miss.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BugError;

/// Bug lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    /// Every status, in sort order.
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Resolved, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// Case-insensitive match against the canonical names.
    #[must_use]
    pub fn lookup(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(text))
    }

    /// Like [`Status::lookup`], falling back to `NEW`.
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        Self::lookup(text).unwrap_or_default()
    }

    /// Neither resolved nor closed.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = BugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| BugError::InvalidStatus {
            status: s.to_string(),
        })
    }
}

/// Bug priority, ordered `LOW < MEDIUM < HIGH < CRITICAL`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Every priority, in sort order.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Case-insensitive match against the canonical names.
    #[must_use]
    pub fn lookup(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(text))
    }

    /// Like [`Priority::lookup`], falling back to `LOW`.
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        Self::lookup(text).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = BugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| BugError::InvalidPriority {
            priority: s.to_string(),
        })
    }
}

/// Strict status lookup; `None` means the text was not recognized.
#[must_use]
pub fn coerce_status(text: &str) -> Option<Status> {
    Status::lookup(text)
}

/// Strict priority lookup; `None` means the text was not recognized.
#[must_use]
pub fn coerce_priority(text: &str) -> Option<Priority> {
    Priority::lookup(text)
}

/// The persisted bug entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BugRecord {
    /// Caller-assigned ID; uniqueness is not enforced by the store.
    pub id: u32,

    pub title: String,

    pub description: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    /// Assignee name.
    pub assigned_to: String,

    /// Append-only comment lines, oldest first.
    #[serde(default)]
    pub comments: Vec<String>,
}

impl BugRecord {
    /// Overwrite one field from raw text, coercing status and priority.
    pub fn apply_field(&mut self, field: BugField, value: &str) {
        match field {
            BugField::Title => value.clone_into(&mut self.title),
            BugField::Description => value.clone_into(&mut self.description),
            BugField::Status => self.status = Status::coerce(value),
            BugField::Priority => self.priority = Priority::coerce(value),
            BugField::AssignedTo => value.clone_into(&mut self.assigned_to),
        }
    }

    /// Current value of one field as text.
    #[must_use]
    pub fn field_value(&self, field: BugField) -> &str {
        match field {
            BugField::Title => &self.title,
            BugField::Description => &self.description,
            BugField::Status => self.status.as_str(),
            BugField::Priority => self.priority.as_str(),
            BugField::AssignedTo => &self.assigned_to,
        }
    }
}

/// Selects the single editable field of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BugField {
    Title,
    Description,
    Status,
    Priority,
    AssignedTo,
}

impl BugField {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::AssignedTo,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::AssignedTo => "assigned_to",
        }
    }
}

impl fmt::Display for BugField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BugField {
    type Err = BugError;

    /// Accepts field names and the numbered menu choices `1`-`5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" | "1" => Ok(Self::Title),
            "description" | "desc" | "2" => Ok(Self::Description),
            "status" | "3" => Ok(Self::Status),
            "priority" | "4" => Ok(Self::Priority),
            "assigned_to" | "assignedto" | "assigned-to" | "assignee" | "5" => {
                Ok(Self::AssignedTo)
            }
            other => Err(BugError::InvalidField {
                field: other.to_string(),
            }),
        }
    }
}

/// Next free ID: one past the largest existing ID, or 1 when empty.
#[must_use]
pub fn next_id(records: &[BugRecord]) -> u32 {
    records
        .iter()
        .map(|record| record.id)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}
