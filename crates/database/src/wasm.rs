//! Browser bindings.
//!
//! [`LocalStorage`] adapts `window.localStorage` to [`KeyValueStore`], and
//! [`JsDatabase`] exposes a `Database` to JavaScript. Its `query`, `update` and
//! `delete` accept either a plain object (criteria) or a function (predicate);
//! the argument is turned into a [`Query`] once, here.

use crate::database::Database;
use serde::Serialize;
use stowdb_core::{Error, Result, Row, RowId};
use stowdb_query::{Criteria, Query};
use stowdb_storage::KeyValueStore;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const LOCAL_STORAGE: &str = "localStorage";

fn js_persistence(key: &str, err: JsValue) -> Error {
    Error::persistence(key, err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn to_js(err: Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// `window.localStorage` as a persistence adapter. Blobs are stored as UTF-8 text.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Binds to the current window's local storage.
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| Error::persistence(LOCAL_STORAGE, "no global window"))?;
        let storage = window
            .local_storage()
            .map_err(|e| js_persistence(LOCAL_STORAGE, e))?
            .ok_or_else(|| Error::persistence(LOCAL_STORAGE, "local storage unavailable"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.storage
            .get_item(key)
            .map(|item| item.map(String::into_bytes))
            .map_err(|e| js_persistence(key, e))
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value).map_err(|e| Error::persistence(key, e.to_string()))?;
        self.storage
            .set_item(key, text)
            .map_err(|e| js_persistence(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_persistence(key, e))
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

/// Resolves a JS argument into a query: functions become predicates, other
/// objects become criteria.
fn to_query(arg: &JsValue) -> std::result::Result<Query<'static>, JsValue> {
    if let Some(func) = arg.dyn_ref::<js_sys::Function>() {
        let func = func.clone();
        return Ok(Query::predicate(move |row: &Row| {
            to_value(row)
                .and_then(|js_row| func.call1(&JsValue::NULL, &js_row))
                .map(|result| result.is_truthy())
                .unwrap_or(false)
        }));
    }
    if arg.is_object() {
        let criteria: Criteria = serde_wasm_bindgen::from_value(arg.clone())?;
        return Ok(Query::values(criteria));
    }
    Err(JsValue::from_str("query must be an object or a function"))
}

/// JavaScript-facing database backed by `localStorage`.
#[wasm_bindgen(js_name = Database)]
pub struct JsDatabase {
    inner: Option<Database<LocalStorage>>,
}

impl JsDatabase {
    fn db(&self) -> std::result::Result<&Database<LocalStorage>, JsValue> {
        self.inner
            .as_ref()
            .ok_or_else(|| JsValue::from_str("database has been dropped"))
    }

    fn db_mut(&mut self) -> std::result::Result<&mut Database<LocalStorage>, JsValue> {
        self.inner
            .as_mut()
            .ok_or_else(|| JsValue::from_str("database has been dropped"))
    }
}

#[wasm_bindgen(js_class = Database)]
impl JsDatabase {
    /// Opens or creates the named database.
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> std::result::Result<JsDatabase, JsValue> {
        let store = LocalStorage::new().map_err(to_js)?;
        let db = Database::open(store, name).map_err(to_js)?;
        Ok(Self { inner: Some(db) })
    }

    #[wasm_bindgen(js_name = isNew)]
    pub fn is_new(&self) -> std::result::Result<bool, JsValue> {
        Ok(self.db()?.is_new())
    }

    pub fn commit(&mut self) -> std::result::Result<(), JsValue> {
        self.db_mut()?.commit().map_err(to_js)
    }

    /// Removes the database from storage. Every later call fails.
    pub fn drop(&mut self) -> std::result::Result<(), JsValue> {
        let db = self
            .inner
            .take()
            .ok_or_else(|| JsValue::from_str("database has been dropped"))?;
        db.drop().map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = tableExists)]
    pub fn table_exists(&self, table: &str) -> std::result::Result<bool, JsValue> {
        Ok(self.db()?.table_exists(table))
    }

    #[wasm_bindgen(js_name = tableCount)]
    pub fn table_count(&self) -> std::result::Result<u32, JsValue> {
        Ok(self.db()?.table_count() as u32)
    }

    #[wasm_bindgen(js_name = createTable)]
    pub fn create_table(&mut self, table: &str, fields: js_sys::Array) -> std::result::Result<(), JsValue> {
        let fields = fields
            .iter()
            .map(|f| f.as_string().ok_or_else(|| JsValue::from_str("field names must be strings")))
            .collect::<std::result::Result<Vec<String>, JsValue>>()?;
        self.db_mut()?.create_table(table, fields).map_err(to_js)
    }

    #[wasm_bindgen(js_name = dropTable)]
    pub fn drop_table(&mut self, table: &str) -> std::result::Result<(), JsValue> {
        self.db_mut()?.drop_table(table).map_err(to_js)
    }

    pub fn truncate(&mut self, table: &str) -> std::result::Result<(), JsValue> {
        self.db_mut()?.truncate(table).map_err(to_js)
    }

    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self, table: &str) -> std::result::Result<u32, JsValue> {
        Ok(self.db()?.row_count(table).map_err(to_js)? as u32)
    }

    /// Inserts a row object and returns its ID.
    pub fn insert(&mut self, table: &str, data: JsValue) -> std::result::Result<f64, JsValue> {
        let row: Row = serde_wasm_bindgen::from_value(data)?;
        let id = self.db_mut()?.insert(table, row).map_err(to_js)?;
        Ok(id as f64)
    }

    /// Returns matching rows as plain objects.
    pub fn query(&self, table: &str, query: JsValue, limit: Option<u32>) -> std::result::Result<JsValue, JsValue> {
        let query = to_query(&query)?;
        let rows = self
            .db()?
            .query(table, &query, limit.map(|n| n as usize))
            .map_err(to_js)?;
        to_value(&rows)
    }

    /// Selects rows by ID.
    pub fn select(&self, table: &str, ids: Vec<f64>) -> std::result::Result<JsValue, JsValue> {
        let ids: Vec<RowId> = ids.into_iter().map(|id| id as RowId).collect();
        let rows = self.db()?.select(table, &ids).map_err(to_js)?;
        to_value(&rows)
    }

    /// Replaces each matching row with what `update` returns for it.
    pub fn update(
        &mut self,
        table: &str,
        query: JsValue,
        update: &js_sys::Function,
    ) -> std::result::Result<u32, JsValue> {
        let query = to_query(&query)?;
        let mut failure: Option<JsValue> = None;
        let replaced = self
            .db_mut()?
            .update_where(table, &query, |row| {
                let result = to_value(&row)
                    .and_then(|js_row| update.call1(&JsValue::NULL, &js_row))
                    .and_then(|out| {
                        if out.is_truthy() {
                            serde_wasm_bindgen::from_value::<Row>(out).map(Some).map_err(Into::into)
                        } else {
                            Ok(None)
                        }
                    });
                match result {
                    Ok(row) => row,
                    Err(err) => {
                        failure.get_or_insert(err);
                        None
                    }
                }
            })
            .map_err(to_js)?;
        match failure {
            Some(err) => Err(err),
            None => Ok(replaced as u32),
        }
    }

    /// Deletes matching rows and returns how many were removed.
    pub fn delete(&mut self, table: &str, query: JsValue) -> std::result::Result<u32, JsValue> {
        let query = to_query(&query)?;
        let removed = self.db_mut()?.delete(table, &query).map_err(to_js)?;
        Ok(removed as u32)
    }
}
