//! Criteria matching.
//!
//! A [`Criteria`] is a flat field → value mapping. A row matches when **any**
//! one criterion field matches its stored value; fields are not combined with
//! AND. Textual criteria compare case-insensitively against textual stored
//! values; every other criterion compares by equality, with integers and
//! floats compared numerically.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use stowdb_core::schema::TableSchema;
use stowdb_core::{Row, Value};

/// Field → value mapping for equality-style queries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria {
    fields: BTreeMap<String, Value>,
}

impl Criteria {
    /// Creates empty criteria, which match nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style criterion.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Drops criteria on fields the schema does not declare.
    pub fn restrict_to(mut self, schema: &TableSchema) -> Self {
        self.fields.retain(|field, _| schema.has_field(field));
        self
    }

    /// Returns true if any criterion matches the row.
    pub fn matches(&self, row: &Row) -> bool {
        self.fields.iter().any(|(field, wanted)| {
            row.get(field)
                .is_some_and(|stored| value_matches(stored, wanted))
        })
    }

    /// Returns the number of criteria.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no criteria.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates criteria in field-name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Criteria
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<Row> for Criteria {
    fn from(row: Row) -> Self {
        row.into_iter().collect()
    }
}

/// Compares one stored value against one criterion value.
pub fn value_matches(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::String(stored), Value::String(wanted)) => eq_ignore_case(stored, wanted),
        (_, Value::String(_)) => false,
        _ => stored == wanted,
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
