//! Configuration for StowDB.
//!
//! Controls how a database is keyed inside its persistence adapter and how the
//! blob is encoded.

use stowdb_core::{Error, Result};

/// Prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "db_";

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace prepended to the database name to form the adapter key
    pub key_prefix: String,
    /// Encode the blob as indented JSON
    pub pretty: bool,
}

impl Config {
    /// Default configuration: `db_` prefix, compact JSON.
    pub fn new() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            pretty: false,
        }
    }

    /// Sets the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Enables or disables pretty-printed blobs.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the adapter key for a database name.
    pub fn key_for(&self, db_name: &str) -> String {
        format!("{}{}", self.key_prefix, db_name)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(Error::invalid_config("key_prefix must not be empty"));
        }
        if !self
            .key_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-'))
        {
            return Err(Error::invalid_config(format!(
                "key_prefix '{}' may only contain [A-Za-z0-9_:.-]",
                self.key_prefix
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
