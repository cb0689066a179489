//! Doctor command implementation.
//!
//! Scans the bug file without modifying it and reports lines the store
//! would silently skip, duplicate IDs and unreadable files.

use std::collections::BTreeMap;
use std::path::Path;

use bugtrack_lib::Result;
use bugtrack_lib::flatfile::{self, Loaded};
use bugtrack_lib::users::UserStore;
use serde::Serialize;

use crate::config::{ResolvedConfig, load_file_config};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!("bt doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

fn duplicate_ids(loaded: &Loaded) -> Vec<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in &loaded.records {
        *counts.entry(record.id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect()
}

fn check_bug_file(path: &Path, checks: &mut Vec<CheckResult>) {
    if !path.exists() {
        push_check(
            checks,
            "bugs.exists",
            CheckStatus::Warn,
            Some(format!("{} does not exist yet (run `bt init`)", path.display())),
            None,
        );
        return;
    }

    let loaded = match flatfile::load(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            push_check(
                checks,
                "bugs.read",
                CheckStatus::Error,
                Some(format!("Failed to read bug file: {err}")),
                Some(serde_json::json!({ "path": path.display().to_string() })),
            );
            return;
        }
    };

    if loaded.truncated {
        push_check(
            checks,
            "bugs.read",
            CheckStatus::Error,
            Some(format!(
                "Read stopped early after {} record(s)",
                loaded.records.len()
            )),
            None,
        );
    } else {
        push_check(
            checks,
            "bugs.read",
            CheckStatus::Ok,
            Some(format!("{} record(s)", loaded.records.len())),
            None,
        );
    }

    if loaded.skipped.is_empty() {
        push_check(checks, "bugs.lines", CheckStatus::Ok, None, None);
    } else {
        let lines: Vec<serde_json::Value> = loaded
            .skipped
            .iter()
            .map(|skipped| serde_json::json!({ "line": skipped.line, "reason": skipped.reason }))
            .collect();
        push_check(
            checks,
            "bugs.lines",
            CheckStatus::Warn,
            Some(format!(
                "{} malformed line(s) will be dropped on the next write",
                loaded.skipped.len()
            )),
            Some(serde_json::Value::Array(lines)),
        );
    }

    let duplicates = duplicate_ids(&loaded);
    if duplicates.is_empty() {
        push_check(checks, "bugs.ids", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "bugs.ids",
            CheckStatus::Warn,
            Some(format!(
                "Duplicate IDs (only the first is reachable): {duplicates:?}"
            )),
            Some(serde_json::json!(duplicates)),
        );
    }
}

fn check_users(path: &Path, checks: &mut Vec<CheckResult>) {
    match UserStore::open(path) {
        Ok(users) if users.is_empty() => push_check(
            checks,
            "users",
            CheckStatus::Warn,
            Some("No accounts yet (run `bt user signup`)".to_string()),
            None,
        ),
        Ok(users) => push_check(
            checks,
            "users",
            CheckStatus::Ok,
            Some(format!("{} account(s)", users.len())),
            None,
        ),
        Err(err) => push_check(
            checks,
            "users",
            CheckStatus::Error,
            Some(format!("Failed to read account file: {err}")),
            Some(serde_json::json!({ "path": path.display().to_string() })),
        ),
    }
}

fn collect_checks(config: &ResolvedConfig) -> Vec<CheckResult> {
    let mut checks = Vec::new();

    match load_file_config(&config.root) {
        Ok(_) if config.config_path().exists() => {
            push_check(&mut checks, "config", CheckStatus::Ok, None, None);
        }
        Ok(_) => push_check(
            &mut checks,
            "config",
            CheckStatus::Warn,
            Some("No config file; using defaults".to_string()),
            None,
        ),
        Err(err) => push_check(
            &mut checks,
            "config",
            CheckStatus::Error,
            Some(err.to_string()),
            None,
        ),
    }

    check_bug_file(&config.data_file, &mut checks);
    check_users(&config.users_file, &mut checks);
    checks
}

/// Execute the doctor command. Exits with status 1 when a check fails.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn execute(config: &ResolvedConfig, json: bool) -> Result<()> {
    let checks = collect_checks(config);
    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, json)?;

    if !report.ok {
        std::process::exit(1);
    }

    Ok(())
}
