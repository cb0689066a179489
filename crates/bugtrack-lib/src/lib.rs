//! `bugtrack-lib` - Flat-file bug record store and query engine.
//!
//! Bug records live in a plain comma-delimited text file, one record per
//! line. Every store operation reloads the whole file, mutates the
//! collection in memory and rewrites the file in full.
//!
//! # Quick Start
//!
//! ```no_run
//! use bugtrack_lib::{BugField, BugRecord, Priority, RecordStore, SearchQuery, SortKey, Status};
//!
//! let store = RecordStore::open("data/bugs.txt");
//!
//! // Create
//! let id = bugtrack_lib::next_id(&store.load_all());
//! store.add(BugRecord {
//!     id,
//!     title: "Crash on save".into(),
//!     description: "Saving an empty draft panics".into(),
//!     priority: Priority::High,
//!     assigned_to: "alice".into(),
//!     ..Default::default()
//! });
//!
//! // Update
//! store.update_field(id, BugField::Status, "in_progress");
//!
//! // Query
//! let records = store.load_all();
//! let open_by_priority = bugtrack_lib::search(
//!     &records,
//!     &SearchQuery {
//!         status: Some(Status::InProgress),
//!         sort: Some(SortKey::Priority),
//!         ..Default::default()
//!     },
//! );
//! ```

pub mod error;
pub mod flatfile;
pub mod model;
pub mod query;
pub mod stats;
pub mod store;
pub mod users;

pub use error::{BugError, Result, ValidationError};
pub use model::{BugField, BugRecord, Priority, Status, coerce_priority, coerce_status, next_id};
pub use query::{SearchQuery, SortKey, search};
pub use stats::Statistics;
pub use store::{Backend, FlatFileBackend, MemoryBackend, Mutation, RecordStore};
pub use users::{Permission, Role, User, UserStore};
