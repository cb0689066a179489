//! Update and status command implementations.
//!
//! `update` takes any field and coerces unknown status or priority text
//! with a warning. `status` only accepts a real status name.

use std::str::FromStr;

use bugtrack_lib::model::{BugField, Priority, Status};
use bugtrack_lib::{BugError, Result};

use crate::cli::UpdateArgs;
use crate::config::ResolvedConfig;
use crate::format::MutationResult;
use crate::validation::validate_field_value;

fn warn_if_coerced(field: BugField, value: &str) {
    let fallback = match field {
        BugField::Status if Status::lookup(value).is_none() => Status::default().as_str(),
        BugField::Priority if Priority::lookup(value).is_none() => Priority::default().as_str(),
        _ => return,
    };
    tracing::warn!("Unrecognized {field} '{value}'; using {fallback}");
}

fn apply(
    config: &ResolvedConfig,
    id: u32,
    field: BugField,
    value: &str,
    json: bool,
) -> Result<()> {
    let store = config.record_store();
    super::ensure_applied(store.set_field(id, field, value), id, &store)?;

    let bug = super::find_bug(&store, id)?;
    tracing::info!("Updated bug #{id}: {field}");

    if json {
        return super::print_json(&MutationResult {
            action: "updated",
            id,
            bug: Some(bug),
        });
    }
    println!("Updated bug #{id}: {field} = {}", bug.field_value(field));
    Ok(())
}

/// Execute the update command.
///
/// # Errors
///
/// Returns `InvalidField` for an unknown field, a validation error for a
/// bad value, `BugNotFound` if no bug has the ID, or `Storage` if the bug
/// file cannot be written.
pub fn execute(config: &ResolvedConfig, args: &UpdateArgs, json: bool) -> Result<()> {
    let field = BugField::from_str(&args.field)?;
    validate_field_value(field, &args.value)
        .map_err(|e| BugError::from_validation_errors(vec![e]))?;
    warn_if_coerced(field, &args.value);

    apply(config, args.id, field, &args.value, json)
}

/// Execute the status command.
///
/// # Errors
///
/// Returns `InvalidStatus` for text that names no status, otherwise as
/// [`execute`].
pub fn execute_status(config: &ResolvedConfig, id: u32, status: &str, json: bool) -> Result<()> {
    let status = Status::from_str(status)?;
    apply(config, id, BugField::Status, status.as_str(), json)
}
