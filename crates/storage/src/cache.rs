//! Cache management for StowDB.
//!
//! This module provides the `TableCache` struct which holds the full in-memory
//! state of one database: table schemas and their row sets. It serializes
//! directly to the persisted blob shape.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use stowdb_core::schema::{validate_name, TableSchema};
use stowdb_core::{Error, Result, Row, RowId, RowSet};
use tracing::debug;

/// Schemas and rows of every table in a database.
///
/// `tables` and `data` always share the same key set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCache {
    /// Table name → schema mapping.
    tables: BTreeMap<String, TableSchema>,
    /// Table name → rows mapping.
    data: BTreeMap<String, RowSet>,
}

impl TableCache {
    /// Creates a new empty table cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives every schema a row set. Blobs are loaded without re-validation,
    /// so a schema persisted without its `data` entry is treated as empty.
    pub(crate) fn reconcile(&mut self) {
        for name in self.tables.keys() {
            if !self.data.contains_key(name) {
                debug!(table = %name, "schema without row data, starting empty");
                self.data.insert(name.clone(), RowSet::new());
            }
        }
    }

    /// Creates a table. `ID` is forced to be the first field.
    pub fn create_table<I, S>(&mut self, name: &str, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_name(name)?;
        if self.has_table(name) {
            return Err(Error::duplicate_table(name));
        }
        let schema = TableSchema::new(fields)?;

        debug!(table = %name, fields = ?schema.fields(), "create table");
        self.tables.insert(name.to_owned(), schema);
        self.data.insert(name.to_owned(), RowSet::new());
        Ok(())
    }

    /// Drops a table and all its rows.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            return Err(Error::no_such_table(name));
        }
        self.data.remove(name);
        debug!(table = %name, "drop table");
        Ok(())
    }

    /// Removes all rows and resets the table's ID counter to 1.
    pub fn truncate(&mut self, name: &str) -> Result<()> {
        let (schema, rows) = self.table_mut(name)?;
        schema.reset_auto_increment();
        rows.clear();
        debug!(table = %name, "truncate table");
        Ok(())
    }

    /// Checks if a table exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns all table names.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Gets a table's schema.
    pub fn schema(&self, name: &str) -> Result<&TableSchema> {
        self.tables.get(name).ok_or_else(|| Error::no_such_table(name))
    }

    /// Gets a table's rows.
    pub fn rows(&self, name: &str) -> Result<&RowSet> {
        if !self.has_table(name) {
            return Err(Error::no_such_table(name));
        }
        self.data.get(name).ok_or_else(|| Error::no_such_table(name))
    }

    fn table_mut(&mut self, name: &str) -> Result<(&mut TableSchema, &mut RowSet)> {
        let schema = self
            .tables
            .get_mut(name)
            .ok_or_else(|| Error::no_such_table(name))?;
        let rows = self.data.entry(name.to_owned()).or_default();
        Ok((schema, rows))
    }

    /// Returns the number of rows in a table.
    pub fn row_count(&self, name: &str) -> Result<usize> {
        Ok(self.rows(name)?.len())
    }

    /// Inserts a row built from `data`, returning the assigned ID.
    ///
    /// Undeclared fields are dropped, missing declared fields become `Null`
    /// and any caller-supplied `ID` is overwritten.
    pub fn insert(&mut self, name: &str, data: &Row) -> Result<RowId> {
        let (schema, rows) = self.table_mut(name)?;
        let mut row = schema.conform(data);
        let id = schema.allocate_id();
        row.set_id(id);
        rows.insert(id, row);
        Ok(id)
    }

    /// Gets a row by table name and row ID.
    pub fn get_row(&self, name: &str, id: RowId) -> Result<Option<&Row>> {
        Ok(self.rows(name)?.get(&id))
    }

    /// Replaces an existing row with the declared fields of `data`.
    ///
    /// Returns false if no row has this ID. The stored row keeps its `ID`.
    pub fn replace_row(&mut self, name: &str, id: RowId, data: Row) -> Result<bool> {
        let (schema, rows) = self.table_mut(name)?;
        let Some(slot) = rows.get_mut(&id) else {
            return Ok(false);
        };
        let mut row = schema.project(data);
        row.set_id(id);
        *slot = row;
        Ok(true)
    }

    /// Removes a row, returning it if it existed.
    pub fn remove_row(&mut self, name: &str, id: RowId) -> Result<Option<Row>> {
        let (_, rows) = self.table_mut(name)?;
        Ok(rows.remove(&id))
    }
}
