//! StowDB Query - Full-scan query matching for StowDB.
//!
//! This crate provides:
//!
//! - `criteria`: Field → value criteria and the value matcher
//! - `scan`: ID-producing full-table scans with an optional limit
//! - `query`: The `Query` enum dispatching between criteria and predicates
//!
//! There are no indexes: every query walks the table's rows in ID order.

pub mod criteria;
pub mod query;
pub mod scan;

pub use criteria::{value_matches, Criteria};
pub use query::{Predicate, Query};
pub use scan::{collect_ids, scan_by_predicate, scan_by_values};
