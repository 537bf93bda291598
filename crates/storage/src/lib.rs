//! StowDB Storage - Storage layer for the StowDB table store.
//!
//! This crate provides the storage layer including:
//!
//! - `TableCache`: Schemas and row sets of every table in a database
//! - `codec`: JSON blob encoding of a `TableCache`
//! - `KeyValueStore`: The persistence adapter capability, with `MemoryStore`
//! - `Config`: Adapter key namespace and encoding options
//!
//! # Example
//!
//! ```rust
//! use stowdb_storage::{codec, KeyValueStore, MemoryStore, TableCache};
//! use stowdb_core::Row;
//!
//! let mut cache = TableCache::new();
//! cache.create_table("users", ["name"]).unwrap();
//! let id = cache.insert("users", &Row::new().with("name", "Alice")).unwrap();
//! assert_eq!(id, 1);
//!
//! let mut store = MemoryStore::new();
//! store.set("db_app", &codec::encode(&cache, false).unwrap()).unwrap();
//!
//! let bytes = store.get("db_app").unwrap().unwrap();
//! assert_eq!(codec::decode(&bytes).unwrap(), cache);
//! ```

pub mod adapter;
pub mod cache;
pub mod codec;
pub mod config;

pub use adapter::{KeyValueStore, MemoryStore};
pub use cache::TableCache;
pub use config::{Config, DEFAULT_KEY_PREFIX};
