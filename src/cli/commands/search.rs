//! Search command implementation.
//!
//! Filters are ANDed. Status and priority filters must name a real value;
//! a typo there is an error rather than an empty result.

use std::str::FromStr;

use bugtrack_lib::Result;
use bugtrack_lib::model::{Priority, Status};
use bugtrack_lib::query::{SearchQuery, search};

use crate::cli::SearchArgs;
use crate::config::ResolvedConfig;

fn build_query(args: &SearchArgs) -> Result<SearchQuery> {
    Ok(SearchQuery {
        keyword: args.keyword.clone(),
        status: args.status.as_deref().map(Status::from_str).transpose()?,
        priority: args.priority.as_deref().map(Priority::from_str).transpose()?,
        assignee: args.assignee.clone(),
        sort: super::parse_sort(args.sort.as_deref()),
    })
}

/// Execute the search command.
///
/// # Errors
///
/// Returns `InvalidStatus` / `InvalidPriority` for unknown filter values.
pub fn execute(config: &ResolvedConfig, args: &SearchArgs, json: bool) -> Result<()> {
    let query = build_query(args)?;
    let records = config.record_store().load_all();
    let bugs = search(&records, &query);
    tracing::debug!("Search matched {} of {} bugs", bugs.len(), records.len());

    super::list::print_bugs(&bugs, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugtrack_lib::BugError;
    use bugtrack_lib::query::SortKey;

    #[test]
    fn test_build_query_parses_filters() {
        let args = SearchArgs {
            keyword: Some("login".to_string()),
            status: Some("in_progress".to_string()),
            priority: Some("HIGH".to_string()),
            assignee: None,
            sort: Some("Status".to_string()),
        };
        let query = build_query(&args).unwrap();
        assert_eq!(query.status, Some(Status::InProgress));
        assert_eq!(query.priority, Some(Priority::High));
        assert_eq!(query.sort, Some(SortKey::Status));
    }

    #[test]
    fn test_build_query_rejects_unknown_status() {
        let args = SearchArgs {
            status: Some("open".to_string()),
            ..SearchArgs::default()
        };
        let err = build_query(&args).unwrap_err();
        assert!(matches!(err, BugError::InvalidStatus { .. }));
    }
}
