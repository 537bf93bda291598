//! StowDB Core - Core types and schema definitions for StowDB.
//!
//! This crate provides the foundational types for the StowDB table store:
//!
//! - `Value`: Scalar values that can be stored in a row field
//! - `Row`: A field name → value record
//! - `RowSet`: All rows of a table keyed by ID
//! - `schema`: Table schemas and naming rules
//! - `Error`: Error types for database operations
//!
//! # Example
//!
//! ```rust
//! use stowdb_core::schema::TableSchema;
//! use stowdb_core::{Row, Value};
//!
//! let mut schema = TableSchema::new(["name", "age"]).unwrap();
//! assert_eq!(schema.fields(), &["ID", "name", "age"]);
//!
//! let mut row = schema.conform(&Row::new().with("name", "Alice"));
//! row.set_id(schema.allocate_id());
//!
//! assert_eq!(row.id(), Some(1));
//! assert_eq!(row.get("age"), Some(&Value::Null));
//! ```

mod error;
mod row;
pub mod schema;
mod value;

pub use error::{Error, Result};
pub use row::{Row, RowId, RowSet};
pub use value::Value;
