//! Record store over a full-reload/full-rewrite backend.
//!
//! The store keeps no state between calls. Every operation loads the
//! whole collection from its [`Backend`], mutates it in memory and writes
//! the whole collection back. Backend failures are logged and never
//! propagate to the caller.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::flatfile;
use crate::model::{BugField, BugRecord};

/// Storage medium holding the full bug collection.
pub trait Backend {
    /// Read the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn load(&self) -> Result<Vec<BugRecord>>;

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn save(&self, records: &[BugRecord]) -> Result<()>;
}

/// The delimited text file backend.
#[derive(Debug, Clone)]
pub struct FlatFileBackend {
    path: PathBuf,
}

impl FlatFileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for FlatFileBackend {
    fn load(&self) -> Result<Vec<BugRecord>> {
        let loaded = flatfile::load(&self.path)?;
        if loaded.truncated {
            tracing::warn!(
                "Partial load of {}: kept {} bug(s)",
                self.path.display(),
                loaded.records.len()
            );
        }
        Ok(loaded.records)
    }

    fn save(&self, records: &[BugRecord]) -> Result<()> {
        flatfile::save(&self.path, records)
    }
}

/// In-process backend, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RefCell<Vec<BugRecord>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: Vec<BugRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BugRecord> {
        self.records.borrow().clone()
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Vec<BugRecord>> {
        Ok(self.snapshot())
    }

    fn save(&self, records: &[BugRecord]) -> Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}

/// Outcome of a single-record mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// No record had the ID; nothing was written.
    NotFound,
    /// The record changed and the collection was written back.
    Persisted,
    /// The record matched but the collection could not be written.
    Unpersisted,
}

impl Mutation {
    /// Whether a record with the ID existed.
    #[must_use]
    pub const fn found(self) -> bool {
        !matches!(self, Self::NotFound)
    }

    const fn from_save(persisted: bool) -> Self {
        if persisted {
            Self::Persisted
        } else {
            Self::Unpersisted
        }
    }
}

/// Bug record store.
///
/// Lookups act on the first record with a matching ID; the store never
/// checks ID uniqueness.
#[derive(Debug)]
pub struct RecordStore<B: Backend = FlatFileBackend> {
    backend: B,
}

impl RecordStore<FlatFileBackend> {
    /// Store backed by the bug file at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FlatFileBackend::new(path))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.backend.path()
    }
}

impl RecordStore<MemoryBackend> {
    /// Empty store held in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: Backend> RecordStore<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    // ========================================================================
    // Whole collection
    // ========================================================================

    /// Load every record, in medium order.
    ///
    /// Returns an empty collection if the medium cannot be read.
    #[must_use]
    pub fn load_all(&self) -> Vec<BugRecord> {
        match self.backend.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Error loading bugs: {e}");
                Vec::new()
            }
        }
    }

    /// Replace the stored collection. Returns whether it was persisted.
    pub fn save_all(&self, records: &[BugRecord]) -> bool {
        match self.backend.save(records) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving bugs: {e}");
                false
            }
        }
    }

    // ========================================================================
    // Single record
    // ========================================================================

    /// Append a record. Returns whether the collection was persisted.
    pub fn add(&self, record: BugRecord) -> bool {
        let mut records = self.load_all();
        tracing::debug!("Adding bug {}", record.id);
        records.push(record);
        self.save_all(&records)
    }

    #[must_use]
    pub fn find_by_id(&self, id: u32) -> Option<BugRecord> {
        self.load_all().into_iter().find(|record| record.id == id)
    }

    /// Remove the first record with `id`. Returns `false` if none matched.
    pub fn delete_by_id(&self, id: u32) -> bool {
        self.remove_first(id).found()
    }

    /// Overwrite one field of the first record with `id`.
    ///
    /// Status and priority text is coerced to a default when unrecognized.
    /// Returns `false` if no record matched.
    pub fn update_field(&self, id: u32, field: BugField, value: &str) -> bool {
        self.set_field(id, field, value).found()
    }

    /// Append a comment to the first record with `id`.
    ///
    /// Returns `false` if no record matched.
    pub fn add_comment(&self, id: u32, text: &str) -> bool {
        self.append_comment(id, text).found()
    }

    /// [`delete_by_id`](Self::delete_by_id), also reporting whether the
    /// removal reached the medium.
    pub fn remove_first(&self, id: u32) -> Mutation {
        let mut records = self.load_all();
        let Some(pos) = records.iter().position(|record| record.id == id) else {
            return Mutation::NotFound;
        };
        records.remove(pos);
        tracing::debug!("Deleted bug {id}");
        Mutation::from_save(self.save_all(&records))
    }

    /// [`update_field`](Self::update_field) with the write outcome.
    pub fn set_field(&self, id: u32, field: BugField, value: &str) -> Mutation {
        self.modify_first(id, |record| {
            record.apply_field(field, value);
            tracing::debug!("Bug {id}: {field} = {}", record.field_value(field));
        })
    }

    /// [`add_comment`](Self::add_comment) with the write outcome.
    pub fn append_comment(&self, id: u32, text: &str) -> Mutation {
        self.modify_first(id, |record| record.comments.push(text.to_string()))
    }

    fn modify_first<F>(&self, id: u32, change: F) -> Mutation
    where
        F: FnOnce(&mut BugRecord),
    {
        let mut records = self.load_all();
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Mutation::NotFound;
        };
        change(record);
        Mutation::from_save(self.save_all(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};
    use std::fs;

    fn make_bug(id: u32, title: &str) -> BugRecord {
        BugRecord {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            status: Status::New,
            priority: Priority::Medium,
            assigned_to: "dev".to_string(),
            comments: vec![],
        }
    }

    fn file_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("bugs.txt"));
        (dir, store)
    }

    #[test]
    fn test_lifecycle_against_file() {
        let (_dir, store) = file_store();
        assert!(store.load_all().is_empty());

        assert!(store.add(make_bug(1, "Login fails")));
        let loaded = store.load_all();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 1);

        assert!(store.update_field(1, BugField::Status, "resolved"));
        assert_eq!(store.load_all()[0].status, Status::Resolved);

        assert!(store.delete_by_id(1));
        assert!(store.load_all().is_empty());
        assert!(!store.delete_by_id(1));
    }

    #[test]
    fn test_load_all_twice_is_stable() {
        let (_dir, store) = file_store();
        store.add(make_bug(1, "A"));
        store.add(make_bug(2, "B"));
        assert_eq!(store.load_all(), store.load_all());
    }

    #[test]
    fn test_save_all_round_trip() {
        let (_dir, store) = file_store();
        let mut second = make_bug(2, "Second");
        second.comments = vec!["seen on staging".to_string(), "fixed?".to_string()];
        second.priority = Priority::Critical;
        let records = vec![make_bug(1, "First"), second];

        assert!(store.save_all(&records));
        assert_eq!(store.load_all(), records);
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let (_dir, store) = file_store();
        fs::write(
            store.path(),
            "1,Good,desc,NEW,LOW,amy,\n2,short,line,NEW,LOW\n",
        )
        .unwrap();
        let loaded = store.load_all();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Good");
    }

    #[test]
    fn test_duplicate_ids_act_on_first_match() {
        let store = RecordStore::in_memory();
        store.add(make_bug(5, "first"));
        store.add(make_bug(5, "second"));
        assert_eq!(store.load_all().len(), 2);

        assert_eq!(store.find_by_id(5).unwrap().title, "first");

        assert!(store.update_field(5, BugField::Title, "renamed"));
        let records = store.load_all();
        assert_eq!(records[0].title, "renamed");
        assert_eq!(records[1].title, "second");

        assert!(store.delete_by_id(5));
        let records = store.load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "second");
    }

    #[test]
    fn test_update_field_coerces_invalid_enum_text() {
        let store = RecordStore::in_memory();
        store.add(BugRecord {
            status: Status::Closed,
            priority: Priority::High,
            ..make_bug(1, "x")
        });
        assert!(store.update_field(1, BugField::Status, "bogus"));
        assert!(store.update_field(1, BugField::Priority, "bogus"));
        let bug = store.find_by_id(1).unwrap();
        assert_eq!(bug.status, Status::New);
        assert_eq!(bug.priority, Priority::Low);
    }

    #[test]
    fn test_update_missing_does_not_write() {
        let (_dir, store) = file_store();
        assert!(!store.update_field(9, BugField::Title, "nope"));
        assert!(!store.add_comment(9, "nope"));
        assert!(!store.delete_by_id(9));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_comment_appends_in_order() {
        let store = RecordStore::in_memory();
        store.add(make_bug(1, "x"));
        assert!(store.add_comment(1, "first"));
        assert!(store.add_comment(1, "second"));
        assert_eq!(store.find_by_id(1).unwrap().comments, vec!["first", "second"]);
    }

    #[test]
    fn test_find_missing_is_none() {
        let store = RecordStore::in_memory();
        assert!(store.find_by_id(1).is_none());
    }

    #[test]
    fn test_store_reloads_between_calls() {
        let (_dir, store) = file_store();
        store.add(make_bug(1, "x"));
        // Another writer replaces the file between calls.
        fs::write(store.path(), "7,Other,desc,CLOSED,HIGH,zed,\n").unwrap();
        assert!(store.find_by_id(1).is_none());
        assert_eq!(store.find_by_id(7).unwrap().status, Status::Closed);
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bugs.txt");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), "x").unwrap();

        let store = RecordStore::open(&target);
        assert!(!store.save_all(&[make_bug(1, "x")]));
        assert!(!store.add(make_bug(1, "x")));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_mutation_reports_failed_write() {
        let (dir, store) = file_store();
        store.add(make_bug(1, "x"));
        let blocker = dir.path().join("bugs.txt.tmp");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("occupied"), "x").unwrap();

        assert_eq!(store.set_field(1, BugField::Title, "y"), Mutation::Unpersisted);
        assert_eq!(store.append_comment(1, "seen"), Mutation::Unpersisted);
        assert_eq!(store.remove_first(1), Mutation::Unpersisted);
        assert_eq!(store.remove_first(2), Mutation::NotFound);
        // Still found, so the bool contract is unchanged.
        assert!(store.delete_by_id(1));
        assert_eq!(store.find_by_id(1).unwrap().title, "x");

        fs::remove_dir_all(&blocker).unwrap();
        assert_eq!(store.set_field(1, BugField::Title, "y"), Mutation::Persisted);
    }
}
