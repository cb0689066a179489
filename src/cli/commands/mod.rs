//! Command implementations, one module per subcommand.

pub mod comment;
pub mod completions;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod init;
pub mod list;
pub mod search;
pub mod show;
pub mod stats;
pub mod update;
pub mod user;
pub mod version;

use bugtrack_lib::model::BugRecord;
use bugtrack_lib::query::SortKey;
use bugtrack_lib::store::{Mutation, RecordStore};
use bugtrack_lib::{BugError, Result};
use serde::Serialize;

/// Load a bug or fail with `BugNotFound`.
pub(crate) fn find_bug(store: &RecordStore, id: u32) -> Result<BugRecord> {
    store.find_by_id(id).ok_or(BugError::BugNotFound { id })
}

/// Turn a store write result into an error the user sees.
///
/// The store has already logged the cause.
pub(crate) fn ensure_persisted(persisted: bool, store: &RecordStore) -> Result<()> {
    if persisted {
        Ok(())
    } else {
        Err(BugError::Storage(format!(
            "could not write {}",
            store.path().display()
        )))
    }
}

/// Map a single-record mutation to `BugNotFound` or `Storage`.
pub(crate) fn ensure_applied(outcome: Mutation, id: u32, store: &RecordStore) -> Result<()> {
    match outcome {
        Mutation::Persisted => Ok(()),
        Mutation::NotFound => Err(BugError::BugNotFound { id }),
        Mutation::Unpersisted => ensure_persisted(false, store),
    }
}

/// Unrecognized sort text means file order.
pub(crate) fn parse_sort(text: Option<&str>) -> Option<SortKey> {
    let text = text?;
    let key = SortKey::parse(text);
    if key.is_none() {
        tracing::warn!("Unrecognized sort key '{text}'; keeping file order");
    }
    key
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort(None), None);
        assert_eq!(parse_sort(Some("PRIORITY")), Some(SortKey::Priority));
        assert_eq!(parse_sort(Some("status")), Some(SortKey::Status));
        assert_eq!(parse_sort(Some("date")), None);
    }

    #[test]
    fn test_find_bug_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("bugs.txt"));
        let err = find_bug(&store, 4).unwrap_err();
        assert!(matches!(err, BugError::BugNotFound { id: 4 }));
    }

    #[test]
    fn test_ensure_persisted_names_file() {
        let store = RecordStore::open("/nowhere/bugs.txt");
        assert!(ensure_persisted(true, &store).is_ok());
        let err = ensure_persisted(false, &store).unwrap_err();
        assert!(err.to_string().contains("/nowhere/bugs.txt"));
    }

    #[test]
    fn test_ensure_applied_maps_outcomes() {
        let store = RecordStore::open("/nowhere/bugs.txt");
        assert!(ensure_applied(Mutation::Persisted, 3, &store).is_ok());
        assert!(matches!(
            ensure_applied(Mutation::NotFound, 3, &store),
            Err(BugError::BugNotFound { id: 3 })
        ));
        assert!(matches!(
            ensure_applied(Mutation::Unpersisted, 3, &store),
            Err(BugError::Storage(_))
        ));
    }
}
