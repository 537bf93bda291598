//! Full-table scans.
//!
//! Scans walk a [`RowSet`] in ascending ID order and collect the IDs of
//! matching rows, stopping once `limit` IDs have been collected.

use crate::criteria::Criteria;
use stowdb_core::{Row, RowId, RowSet};
use tracing::trace;

/// Collects IDs of rows accepted by `accept`, up to `limit`.
pub fn collect_ids<F>(rows: &RowSet, limit: Option<usize>, mut accept: F) -> Vec<RowId>
where
    F: FnMut(&Row) -> bool,
{
    let mut ids = Vec::new();
    if limit == Some(0) {
        return ids;
    }
    for (id, row) in rows {
        if accept(row) {
            ids.push(*id);
            if limit.is_some_and(|n| ids.len() >= n) {
                break;
            }
        }
    }
    ids
}

/// IDs of rows matching any of `criteria`.
pub fn scan_by_values(rows: &RowSet, criteria: &Criteria, limit: Option<usize>) -> Vec<RowId> {
    if criteria.is_empty() {
        return Vec::new();
    }
    let ids = collect_ids(rows, limit, |row| criteria.matches(row));
    trace!(criteria = criteria.len(), matched = ids.len(), ?limit, "scan by values");
    ids
}

/// IDs of rows for which `predicate` returns true.
pub fn scan_by_predicate<F>(rows: &RowSet, predicate: F, limit: Option<usize>) -> Vec<RowId>
where
    F: FnMut(&Row) -> bool,
{
    let ids = collect_ids(rows, limit, predicate);
    trace!(matched = ids.len(), ?limit, "scan by predicate");
    ids
}
