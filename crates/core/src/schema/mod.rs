//! Schema module for StowDB.
//!
//! This module contains table schema definitions and the naming rules shared by
//! databases, tables and fields.

mod name;
mod table;

pub use name::{is_valid_name, validate_name};
pub use table::{TableSchema, ID_FIELD};
