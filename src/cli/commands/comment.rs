use bugtrack_lib::{BugError, Result};

use crate::config::ResolvedConfig;
use crate::format::MutationResult;
use crate::validation::CommentValidator;

/// Execute the comment command.
///
/// # Errors
///
/// Returns a validation error for empty or delimiter-bearing text,
/// `BugNotFound` if no bug has the ID, or `Storage` if the bug file
/// cannot be written.
pub fn execute(config: &ResolvedConfig, id: u32, text: &str, json: bool) -> Result<()> {
    CommentValidator::validate(text).map_err(BugError::from_validation_errors)?;

    // The comment field is trimmed on load.
    let text = text.trim();
    let store = config.record_store();
    super::ensure_applied(store.append_comment(id, text), id, &store)?;
    tracing::info!("Commented on bug #{id}");

    if json {
        return super::print_json(&MutationResult {
            action: "commented",
            id,
            bug: Some(super::find_bug(&store, id)?),
        });
    }
    println!("Added comment to bug #{id}");
    Ok(())
}
