//! Show command implementation.

use bugtrack_lib::Result;

use crate::config::ResolvedConfig;
use crate::format::format_bug_details;

/// Execute the show command.
///
/// # Errors
///
/// Returns `BugNotFound` if no bug has the ID.
pub fn execute(config: &ResolvedConfig, id: u32, json: bool) -> Result<()> {
    let bug = super::find_bug(&config.record_store(), id)?;

    if json {
        return super::print_json(&bug);
    }
    print!("{}", format_bug_details(&bug));
    Ok(())
}
