use std::fmt::Display;

use bugtrack_lib::model::{BugRecord, Priority, Status, next_id};
use bugtrack_lib::{BugError, Result};

use crate::cli::CreateArgs;
use crate::config::ResolvedConfig;
use crate::validation::BugValidator;

/// Lenient enum lookup that says so when it falls back to the default.
pub(crate) fn coerce_reporting<T: Default + Display>(
    what: &str,
    text: Option<&str>,
    lookup: fn(&str) -> Option<T>,
) -> T {
    let Some(text) = text else {
        return T::default();
    };
    lookup(text).unwrap_or_else(|| {
        let fallback = T::default();
        tracing::warn!("Unrecognized {what} '{text}'; using {fallback}");
        fallback
    })
}

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if validation fails or the bug file cannot be written.
pub fn execute(config: &ResolvedConfig, args: &CreateArgs, json: bool) -> Result<()> {
    // 1. Resolve title
    let title = args
        .title
        .as_deref()
        .or(args.title_flag.as_deref())
        .ok_or_else(|| BugError::validation("title", "cannot be empty"))?;

    // 2. Pick the next ID from what is on disk now
    let store = config.record_store();
    let id = next_id(&store.load_all());

    // 3. Construct and validate
    let bug = BugRecord {
        id,
        title: title.to_string(),
        description: args.description.clone().unwrap_or_default(),
        status: coerce_reporting("status", args.status.as_deref(), Status::lookup),
        priority: coerce_reporting("priority", args.priority.as_deref(), Priority::lookup),
        assigned_to: args.assignee.clone().unwrap_or_default(),
        comments: Vec::new(),
    };
    BugValidator::validate(&bug).map_err(BugError::from_validation_errors)?;

    // 4. Persist
    super::ensure_persisted(store.add(bug.clone()), &store)?;
    tracing::info!("Created bug #{id}");

    // 5. Output
    if json {
        return super::print_json(&bug);
    }
    println!("Created bug #{}: {}", bug.id, bug.title);
    Ok(())
}
