//! Database - Main entry point for StowDB operations.
//!
//! This module provides the `Database` struct which owns the in-memory state of
//! one named database and synchronizes it with a persistence adapter on
//! [`Database::commit`].

use stowdb_core::schema::validate_name;
use stowdb_core::{Error, Result, Row, RowId};
use stowdb_query::{scan_by_predicate, scan_by_values, Criteria, Query};
use stowdb_storage::{codec, Config, KeyValueStore, TableCache};
use tracing::{debug, warn};

/// One named database held in memory and persisted as a single blob.
///
/// Every mutation only touches memory until [`commit`](Database::commit).
/// Two handles opened on the same key are not coordinated: the last commit
/// wins.
pub struct Database<S: KeyValueStore> {
    name: String,
    key: String,
    config: Config,
    store: S,
    cache: TableCache,
    is_new: bool,
}

impl<S: KeyValueStore> Database<S> {
    /// Opens `name` with the default configuration.
    pub fn open(store: S, name: &str) -> Result<Self> {
        Self::open_with_config(store, name, Config::default())
    }

    /// Opens `name`, loading its blob or creating and persisting an empty
    /// database when no structurally valid blob exists.
    ///
    /// A valid blob is loaded even when `name` would not pass the naming
    /// rules; creation requires a valid name. A blob with both top-level
    /// objects whose rows cannot be decoded fails with
    /// `Error::Serialization` and is left in place.
    pub fn open_with_config(store: S, name: &str, config: Config) -> Result<Self> {
        config.validate()?;
        let key = config.key_for(name);

        let loaded = match store.get(&key)? {
            Some(bytes) => match codec::decode(&bytes) {
                Ok(cache) => Some(cache),
                Err(err @ Error::MalformedBlob { .. }) => {
                    warn!(db = %name, key = %key, error = %err, "discarding malformed blob");
                    None
                }
                Err(err) => return Err(err),
            },
            None => None,
        };

        let mut db = Self {
            name: name.to_owned(),
            key,
            config,
            store,
            cache: TableCache::new(),
            is_new: false,
        };

        match loaded {
            Some(cache) => {
                debug!(db = %db.name, tables = cache.table_count(), "loaded database");
                db.cache = cache;
            }
            None => {
                validate_name(name)?;
                db.commit()?;
                db.is_new = true;
                debug!(db = %db.name, "created database");
            }
        }
        Ok(db)
    }

    /// Returns the database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the adapter key the blob is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the persistence adapter.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// True iff this open created a fresh database.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Writes the whole in-memory state to the adapter.
    ///
    /// The blob is fully encoded before the adapter is called, so an
    /// encoding failure leaves the previously persisted blob untouched.
    pub fn commit(&mut self) -> Result<()> {
        let bytes = codec::encode(&self.cache, self.config.pretty)?;
        self.store.set(&self.key, &bytes)?;
        debug!(db = %self.name, bytes = bytes.len(), "committed");
        Ok(())
    }

    /// Deletes the persisted blob and consumes the handle, returning the adapter.
    pub fn drop(mut self) -> Result<S> {
        self.store.remove(&self.key)?;
        debug!(db = %self.name, "dropped database");
        Ok(self.store)
    }

    // ---- schema operations ----

    /// Checks if a table exists.
    pub fn table_exists(&self, table: &str) -> bool {
        self.cache.has_table(table)
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.cache.table_count()
    }

    /// Returns all table names in sorted order.
    pub fn table_names(&self) -> Vec<String> {
        self.cache.table_names().into_iter().map(str::to_owned).collect()
    }

    /// Returns a table's declared fields, `ID` first.
    pub fn fields(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.cache.schema(table)?.fields().to_vec())
    }

    /// Creates a table. `ID` is always the first field; callers never need to list it.
    pub fn create_table<I, F>(&mut self, table: &str, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.cache.create_table(table, fields)
    }

    /// Drops a table and its rows.
    pub fn drop_table(&mut self, table: &str) -> Result<()> {
        self.cache.drop_table(table)
    }

    /// Removes every row and resets the table's ID counter to 1.
    pub fn truncate(&mut self, table: &str) -> Result<()> {
        self.cache.truncate(table)
    }

    /// Returns the number of rows in a table.
    pub fn row_count(&self, table: &str) -> Result<usize> {
        self.cache.row_count(table)
    }

    // ---- row operations ----

    /// Inserts a row and returns its assigned ID.
    ///
    /// Undeclared fields and any `ID` in `data` are ignored; declared fields
    /// missing from `data` are stored as `Null`.
    pub fn insert(&mut self, table: &str, data: Row) -> Result<RowId> {
        self.cache.insert(table, &data)
    }

    /// Returns copies of the rows with the given IDs, in input order.
    /// Missing IDs are skipped; repeated IDs are repeated.
    pub fn select(&self, table: &str, ids: &[RowId]) -> Result<Vec<Row>> {
        let rows = self.cache.rows(table)?;
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    /// IDs of rows where any declared criteria field matches.
    pub fn query_by_values(
        &self,
        table: &str,
        criteria: &Criteria,
        limit: Option<usize>,
    ) -> Result<Vec<RowId>> {
        let schema = self.cache.schema(table)?;
        let criteria = criteria.clone().restrict_to(schema);
        Ok(scan_by_values(self.cache.rows(table)?, &criteria, limit))
    }

    /// IDs of rows accepted by `predicate`.
    pub fn query_by_predicate<F>(
        &self,
        table: &str,
        predicate: F,
        limit: Option<usize>,
    ) -> Result<Vec<RowId>>
    where
        F: FnMut(&Row) -> bool,
    {
        Ok(scan_by_predicate(self.cache.rows(table)?, predicate, limit))
    }

    /// IDs selected by `query`.
    pub fn query_ids(&self, table: &str, query: &Query<'_>, limit: Option<usize>) -> Result<Vec<RowId>> {
        let schema = self.cache.schema(table)?;
        Ok(query.resolve(schema, self.cache.rows(table)?, limit))
    }

    /// Copies of the rows selected by `query`, in ID order.
    pub fn query(&self, table: &str, query: &Query<'_>, limit: Option<usize>) -> Result<Vec<Row>> {
        let ids = self.query_ids(table, query, limit)?;
        self.select(table, &ids)
    }

    /// Runs `update` on a copy of each row and stores what it returns.
    ///
    /// A returned row replaces the stored one entirely after being reduced to
    /// the declared fields; it is not merged. The row keeps its `ID`.
    /// Returning `None` or an empty row leaves the stored row unchanged, as
    /// do IDs with no stored row. Returns the number of rows replaced.
    pub fn update<F>(&mut self, table: &str, ids: &[RowId], mut update: F) -> Result<usize>
    where
        F: FnMut(Row) -> Option<Row>,
    {
        let mut replaced = 0;
        for id in ids {
            let Some(current) = self.cache.get_row(table, *id)?.cloned() else {
                continue;
            };
            match update(current) {
                Some(row) if !row.is_empty() => {
                    if self.cache.replace_row(table, *id, row)? {
                        replaced += 1;
                    }
                }
                _ => {}
            }
        }
        debug!(table = %table, replaced, "update");
        Ok(replaced)
    }

    /// Updates every row selected by `query`.
    pub fn update_where<F>(&mut self, table: &str, query: &Query<'_>, update: F) -> Result<usize>
    where
        F: FnMut(Row) -> Option<Row>,
    {
        let ids = self.query_ids(table, query, None)?;
        self.update(table, &ids, update)
    }

    /// Deletes every row selected by `query`. Returns the number removed.
    pub fn delete(&mut self, table: &str, query: &Query<'_>) -> Result<usize> {
        let ids = self.query_ids(table, query, None)?;
        self.delete_by_ids(table, &ids)
    }

    /// Deletes rows by ID. Missing IDs are ignored.
    pub fn delete_by_ids(&mut self, table: &str, ids: &[RowId]) -> Result<usize> {
        let mut removed = 0;
        for id in ids {
            if self.cache.remove_row(table, *id)?.is_some() {
                removed += 1;
            }
        }
        debug!(table = %table, removed, "delete");
        Ok(removed)
    }
}

impl<S: KeyValueStore> std::fmt::Debug for Database<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("tables", &self.cache.table_count())
            .field("is_new", &self.is_new)
            .finish()
    }
}
