//! Output formatting for `bugtrack`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! With `--json`, clean JSON goes to stdout and diagnostics to stderr.
//!
//! # JSON Output Types
//!
//! Bug records serialize directly. The wrappers here cover the rest:
//! - [`UserSummary`] - Account without its password hash (user list/whoami)
//! - [`MutationResult`] - Outcome of a write command

mod output;
mod text;

pub use output::{MutationResult, UserSummary};
pub use text::{
    format_bug_details, format_bug_line, format_bug_table, format_priority, format_statistics,
    format_status_icon, truncate_to_width,
};
