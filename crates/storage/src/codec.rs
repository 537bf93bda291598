//! Blob codec.
//!
//! The whole database is persisted as one JSON document:
//!
//! ```text
//! {
//!   "tables": { "<table>": { "fields": ["ID", ...], "auto_increment": <int> } },
//!   "data":   { "<table>": { "<id>": { "ID": <id>, "<field>": <value> } } }
//! }
//! ```
//!
//! Encoding happens entirely in memory before anything is handed to the
//! adapter, so a failed encode never produces a partial blob.

use crate::cache::TableCache;
use stowdb_core::{Error, Result};

/// Encodes the full database state.
pub fn encode(cache: &TableCache, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(cache)
    } else {
        serde_json::to_vec(cache)
    };
    bytes.map_err(Error::serialization)
}

/// Decodes a persisted blob.
///
/// Fails with [`Error::MalformedBlob`] if the bytes are not JSON or if either
/// top-level `tables` or `data` object is missing. A blob that passes that
/// check but holds rows this crate cannot represent (nested arrays or objects
/// as field values, non-numeric row keys) fails with [`Error::Serialization`].
/// Nested tables are otherwise accepted without schema re-validation.
pub fn decode(bytes: &[u8]) -> Result<TableCache> {
    check_structure(bytes)?;
    let mut cache: TableCache = serde_json::from_slice(bytes).map_err(Error::serialization)?;
    cache.reconcile();
    Ok(cache)
}

fn check_structure(bytes: &[u8]) -> Result<()> {
    let doc: serde_json::Value = serde_json::from_slice(bytes).map_err(Error::malformed_blob)?;
    for key in ["tables", "data"] {
        if !doc.get(key).is_some_and(serde_json::Value::is_object) {
            return Err(Error::malformed_blob(format_args!(
                "missing top-level `{}` object",
                key
            )));
        }
    }
    Ok(())
}
