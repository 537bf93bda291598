//! Naming rules for databases, tables and fields.

use crate::error::{Error, Result};

/// Returns true if `name` is non-empty and contains only `[A-Za-z0-9_]`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates a name follows naming rules.
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::invalid_name(name))
    }
}
