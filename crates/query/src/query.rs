//! Query dispatch.
//!
//! A [`Query`] is either criteria or a predicate closure. The variant is
//! chosen once by the caller; the engine never inspects argument shapes.

use crate::criteria::Criteria;
use crate::scan::{scan_by_predicate, scan_by_values};
use std::fmt;
use stowdb_core::schema::TableSchema;
use stowdb_core::{Row, RowId, RowSet};

/// Boxed row predicate.
pub type Predicate<'a> = Box<dyn Fn(&Row) -> bool + 'a>;

/// Row selection for query, update and delete.
pub enum Query<'a> {
    /// Match rows where any criterion field matches.
    Values(Criteria),
    /// Match rows accepted by the predicate.
    Predicate(Predicate<'a>),
}

impl<'a> Query<'a> {
    /// Builds a criteria query.
    pub fn values(criteria: impl Into<Criteria>) -> Self {
        Query::Values(criteria.into())
    }

    /// Builds a predicate query.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Row) -> bool + 'a,
    {
        Query::Predicate(Box::new(f))
    }

    /// Resolves matching row IDs in ascending ID order.
    ///
    /// Criteria on fields `schema` does not declare are ignored.
    pub fn resolve(&self, schema: &TableSchema, rows: &RowSet, limit: Option<usize>) -> Vec<RowId> {
        match self {
            Query::Values(criteria) => {
                let criteria = criteria.clone().restrict_to(schema);
                scan_by_values(rows, &criteria, limit)
            }
            Query::Predicate(predicate) => scan_by_predicate(rows, |row| predicate(row), limit),
        }
    }
}

impl From<Criteria> for Query<'_> {
    fn from(criteria: Criteria) -> Self {
        Query::Values(criteria)
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Values(criteria) => f.debug_tuple("Values").field(criteria).finish(),
            Query::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
