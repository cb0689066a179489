//! Stats command implementation.

use bugtrack_lib::Result;
use bugtrack_lib::stats::Statistics;

use crate::config::ResolvedConfig;
use crate::format::format_statistics;

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(config: &ResolvedConfig, json: bool) -> Result<()> {
    let stats = Statistics::from_records(&config.record_store().load_all());

    if json {
        return super::print_json(&stats);
    }
    if stats.is_empty() {
        println!("No bugs recorded.");
        return Ok(());
    }
    print!("{}", format_statistics(&stats));
    Ok(())
}
