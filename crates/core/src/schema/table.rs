//! Table schema for StowDB.

use super::name::validate_name;
use crate::error::Result;
use crate::row::{Row, RowId};
use crate::value::Value;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Name of the auto-assigned identifier field present in every table.
pub const ID_FIELD: &str = "ID";

fn first_row_id() -> RowId {
    1
}

/// A table's field list and auto-increment counter.
///
/// `fields` always starts with [`ID_FIELD`] and holds no duplicates when built
/// through [`TableSchema::new`]. Schemas loaded from a persisted blob are taken
/// as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default = "first_row_id")]
    auto_increment: RowId,
}

impl TableSchema {
    /// Creates a schema from caller-supplied field names.
    ///
    /// Every name must pass [`validate_name`]. Any `ID` entry is removed and
    /// `ID` is prepended; repeated names keep their first position.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut normalized = vec![ID_FIELD.to_owned()];
        seen.insert(ID_FIELD.to_owned());

        for field in fields {
            let field = field.into();
            validate_name(&field)?;
            if seen.insert(field.clone()) {
                normalized.push(field);
            }
        }

        Ok(Self {
            fields: normalized,
            auto_increment: first_row_id(),
        })
    }

    /// Returns the declared fields, `ID` first.
    #[inline]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns true if `field` is declared.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Returns the next ID that will be assigned.
    #[inline]
    pub fn auto_increment(&self) -> RowId {
        self.auto_increment
    }

    /// Returns the next ID and advances the counter.
    pub fn allocate_id(&mut self) -> RowId {
        let id = self.auto_increment;
        self.auto_increment += 1;
        id
    }

    /// Resets the counter so the next insert receives ID 1.
    pub fn reset_auto_increment(&mut self) {
        self.auto_increment = first_row_id();
    }

    /// Builds a full-field row for insertion: every declared field is present,
    /// taking the caller's value or `Null`. Undeclared fields are dropped.
    /// Falsy values (`0`, `false`, `""`) are kept; only absent fields become `Null`.
    pub fn conform(&self, data: &Row) -> Row {
        self.fields
            .iter()
            .map(|f| (f.clone(), data.get(f).cloned().unwrap_or(Value::Null)))
            .collect()
    }

    /// Keeps only the declared fields that are present in `data`.
    /// Present fields are kept whatever their value, falsy ones included.
    pub fn project(&self, data: Row) -> Row {
        data.into_iter().filter(|(f, _)| self.has_field(f)).collect()
    }
}
