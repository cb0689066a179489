//! List command implementation.
//!
//! Shows every bug in file order, or stably sorted with `--sort`.

use bugtrack_lib::Result;
use bugtrack_lib::model::BugRecord;
use bugtrack_lib::query::{SearchQuery, search};

use crate::cli::ListArgs;
use crate::config::ResolvedConfig;
use crate::format::format_bug_table;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(config: &ResolvedConfig, args: &ListArgs, json: bool) -> Result<()> {
    let records = config.record_store().load_all();
    let query = SearchQuery {
        sort: super::parse_sort(args.sort.as_deref()),
        ..SearchQuery::default()
    };
    let bugs = search(&records, &query);

    print_bugs(&bugs, json)
}

/// Shared list/search output.
pub(crate) fn print_bugs(bugs: &[&BugRecord], json: bool) -> Result<()> {
    if json {
        return super::print_json(bugs);
    }
    if bugs.is_empty() {
        println!("No bugs found.");
        return Ok(());
    }
    print!("{}", format_bug_table(bugs));
    println!("\n{} bug(s)", bugs.len());
    Ok(())
}
