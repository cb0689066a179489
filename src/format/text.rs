//! Text formatting functions for `bugtrack`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ● ✓)
//! - Priority labels ([HIGH], ...)
//! - Bug lines, tables and detail views
//! - Statistics summaries
//!
//! Column widths are measured in terminal cells, not bytes.

use std::fmt::Write as _;

use bugtrack_lib::model::{BugRecord, Priority, Status};
use bugtrack_lib::stats::Statistics;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// New bug - not yet picked up (hollow circle).
    pub const NEW: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Resolved - fixed, awaiting verification (filled circle).
    pub const RESOLVED: &str = "●";
    /// Closed - done (checkmark).
    pub const CLOSED: &str = "✓";
}

/// Titles wider than this are cut in tables.
const MAX_TITLE_WIDTH: usize = 48;

#[must_use]
pub const fn format_status_icon(status: Status) -> &'static str {
    match status {
        Status::New => icons::NEW,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Resolved => icons::RESOLVED,
        Status::Closed => icons::CLOSED,
    }
}

/// Format priority as a bracketed label, e.g. `[HIGH]`.
#[must_use]
pub fn format_priority(priority: Priority) -> String {
    format!("[{}]", priority.as_str())
}

/// Format a single-line bug summary.
///
/// Format: `{icon} #{id} [{priority}] {title} (@{assignee})`
#[must_use]
pub fn format_bug_line(bug: &BugRecord) -> String {
    format!(
        "{} #{} {} {} (@{})",
        format_status_icon(bug.status),
        bug.id,
        format_priority(bug.priority),
        bug.title,
        bug.assigned_to,
    )
}

/// Cut `text` to at most `max_width` cells, marking the cut with `…`.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Format bugs as an aligned table with a header row.
#[must_use]
pub fn format_bug_table(bugs: &[&BugRecord]) -> String {
    const HEADERS: [&str; 5] = ["ID", "STATUS", "PRIORITY", "ASSIGNEE", "TITLE"];

    let rows: Vec<[String; 5]> = bugs
        .iter()
        .map(|bug| {
            [
                bug.id.to_string(),
                format!("{} {}", format_status_icon(bug.status), bug.status),
                bug.priority.to_string(),
                bug.assigned_to.clone(),
                truncate_to_width(&bug.title, MAX_TITLE_WIDTH),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 5]| {
        let last = cells.len() - 1;
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == last {
                    (*cell).to_string()
                } else {
                    pad(cell, widths[i])
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_row(HEADERS);
    for row in &rows {
        push_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]);
    }
    out
}

/// Format the full view of one bug, comments numbered from 1.
#[must_use]
pub fn format_bug_details(bug: &BugRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", bug.id, bug.title);
    let _ = writeln!(
        out,
        "Status:      {} {}",
        format_status_icon(bug.status),
        bug.status
    );
    let _ = writeln!(out, "Priority:    {}", bug.priority);
    let _ = writeln!(out, "Assigned to: {}", bug.assigned_to);
    out.push('\n');
    let _ = writeln!(out, "Description:");
    let _ = writeln!(out, "  {}", bug.description);
    out.push('\n');

    if bug.comments.is_empty() {
        out.push_str("No comments.\n");
    } else {
        let _ = writeln!(out, "Comments ({}):", bug.comments.len());
        for (i, comment) in bug.comments.iter().enumerate() {
            let _ = writeln!(out, "  {}. {comment}", i + 1);
        }
    }
    out
}

/// Format aggregate counts. Every status and priority is listed, zeros included.
#[must_use]
pub fn format_statistics(stats: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total bugs: {} ({} open)", stats.total, stats.open);

    out.push_str("\nBy status:\n");
    for status in Status::ALL {
        let count = stats.by_status.get(&status).copied().unwrap_or(0);
        let _ = writeln!(out, "  {}{count}", pad(status.as_str(), 13));
    }

    out.push_str("\nBy priority:\n");
    for priority in Priority::ALL {
        let count = stats.by_priority.get(&priority).copied().unwrap_or(0);
        let _ = writeln!(out, "  {}{count}", pad(priority.as_str(), 13));
    }

    out.push_str("\nBy assignee:\n");
    if stats.by_assignee.is_empty() {
        out.push_str("  (none)\n");
    }
    let width = stats
        .by_assignee
        .keys()
        .map(|name| name.width())
        .max()
        .unwrap_or(0)
        + 2;
    for (name, count) in &stats.by_assignee {
        let _ = writeln!(out, "  {}{count}", pad(name, width));
    }
    out
}
