//! Delete command implementation.

use bugtrack_lib::Result;

use crate::config::ResolvedConfig;
use crate::format::MutationResult;

/// Execute the delete command. Only the first bug with the ID is removed.
///
/// # Errors
///
/// Returns `BugNotFound` if no bug has the ID, or `Storage` if the bug
/// file cannot be written.
pub fn execute(config: &ResolvedConfig, id: u32, json: bool) -> Result<()> {
    let store = config.record_store();
    super::ensure_applied(store.remove_first(id), id, &store)?;
    tracing::info!("Deleted bug #{id}");

    if json {
        return super::print_json(&MutationResult {
            action: "deleted",
            id,
            bug: None,
        });
    }
    println!("Deleted bug #{id}");
    Ok(())
}
