//! StowDB - an embedded table store persisted as one blob in a key-value store.
//!
//! Tables have a fixed list of untyped fields plus an auto-assigned `ID`.
//! All data lives in memory; [`Database::commit`] writes the whole state to the
//! injected [`KeyValueStore`] in one call.
//!
//! # Core Components
//!
//! - `Database`: Main entry point: lifecycle, schema and row operations
//! - `Query`: Criteria (`Query::values`) or predicate (`Query::predicate`) selection
//! - `KeyValueStore`: Persistence adapter capability, with `MemoryStore` for tests
//! - `Config`: Adapter key prefix and blob encoding options
//!
//! # Example
//!
//! ```rust
//! use stowdb::{Criteria, Database, MemoryStore, Query, Row};
//!
//! let mut db = Database::open(MemoryStore::new(), "library").unwrap();
//! assert!(db.is_new());
//!
//! db.create_table("books", ["title", "author", "year"]).unwrap();
//! db.insert("books", Row::new().with("title", "Dune").with("author", "Herbert").with("year", 1965)).unwrap();
//! db.insert("books", Row::new().with("title", "Emma").with("author", "Austen").with("year", 1815)).unwrap();
//!
//! // Text criteria ignore case.
//! let rows = db.query("books", &Query::values(Criteria::new().with("author", "austen")), None).unwrap();
//! assert_eq!(rows[0].id(), Some(2));
//!
//! // Predicates see each row read-only.
//! let old = Query::predicate(|row| row.get("year").and_then(|v| v.as_i64()).is_some_and(|y| y < 1900));
//! assert_eq!(db.delete("books", &old).unwrap(), 1);
//!
//! db.commit().unwrap();
//! ```

pub mod database;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use database::Database;
pub use stowdb_core::schema::{TableSchema, ID_FIELD};
pub use stowdb_core::{Error, Result, Row, RowId, RowSet, Value};
pub use stowdb_query::{Criteria, Predicate, Query};
pub use stowdb_storage::{Config, KeyValueStore, MemoryStore, DEFAULT_KEY_PREFIX};
