//! Error types for StowDB.

use thiserror::Error;

/// Result type alias for StowDB operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for StowDB operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A database, table or field name contains characters outside `[A-Za-z0-9_]`.
    #[error("the name '{name}' contains invalid characters")]
    InvalidName { name: String },

    /// A table with this name already exists.
    #[error("the table '{name}' already exists")]
    DuplicateTable { name: String },

    /// The addressed table does not exist.
    #[error("the table '{name}' does not exist")]
    NoSuchTable { name: String },

    /// The persistence adapter failed to read, write or remove a key.
    #[error("persistence error on key '{key}': {message}")]
    Persistence { key: String, message: String },

    /// A persisted blob is not JSON or lacks the top-level `tables`/`data` objects.
    #[error("malformed blob: {message}")]
    MalformedBlob { message: String },

    /// A well-formed blob holds rows that cannot be decoded, or the in-memory
    /// state cannot be encoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Configuration rejected by validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Error::InvalidName { name: name.into() }
    }

    /// Creates a duplicate table error.
    pub fn duplicate_table(name: impl Into<String>) -> Self {
        Error::DuplicateTable { name: name.into() }
    }

    /// Creates a missing table error.
    pub fn no_such_table(name: impl Into<String>) -> Self {
        Error::NoSuchTable { name: name.into() }
    }

    /// Creates a persistence error for the given adapter key.
    pub fn persistence(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Persistence {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed blob error from anything displayable.
    pub fn malformed_blob(err: impl std::fmt::Display) -> Self {
        Error::MalformedBlob {
            message: err.to_string(),
        }
    }

    /// Creates a serialization error from anything displayable.
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Error::Serialization {
            message: err.to_string(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }
}
