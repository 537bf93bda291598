//! End-to-end tests for `Database` against in-memory adapters.

use stowdb::{Config, Criteria, Database, Error, KeyValueStore, MemoryStore, Query, Row, Value};

fn open(store: &MemoryStore) -> Database<MemoryStore> {
    Database::open(store.clone(), "app").unwrap()
}

/// Adapter whose writes can be switched off.
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: bool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> stowdb::Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> stowdb::Result<()> {
        if self.fail_writes {
            return Err(Error::persistence(key, "quota exceeded"));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> stowdb::Result<()> {
        self.inner.remove(key)
    }
}

#[test]
fn users_scenario() {
    let store = MemoryStore::new();
    let mut db = open(&store);

    db.create_table("users", ["ID", "name", "age"]).unwrap();
    let ann = db.insert("users", Row::new().with("name", "Ann").with("age", 30)).unwrap();
    let bo = db.insert("users", Row::new().with("name", "Bo").with("age", 25)).unwrap();
    assert_eq!((ann, bo), (1, 2));

    let found = db
        .query("users", &Query::values(Criteria::new().with("name", "ann")), None)
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), Some(1));

    let removed = db
        .delete("users", &Query::values(Criteria::new().with("age", 25)))
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(db.row_count("users").unwrap(), 1);
}

#[test]
fn ids_are_monotonic_and_never_reused() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["v"]).unwrap();

    let ids: Vec<_> = (0..5)
        .map(|i| db.insert("t", Row::new().with("v", i)).unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    db.delete_by_ids("t", &[5, 4]).unwrap();
    assert_eq!(db.insert("t", Row::new()).unwrap(), 6);
}

#[test]
fn truncate_resets_counter() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["v"]).unwrap();
    db.insert("t", Row::new()).unwrap();
    db.insert("t", Row::new()).unwrap();

    db.truncate("t").unwrap();
    assert_eq!(db.row_count("t").unwrap(), 0);
    assert_eq!(db.insert("t", Row::new()).unwrap(), 1);
}

#[test]
fn insert_filters_fields() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["foo"]).unwrap();
    let id = db
        .insert("t", Row::new().with("ID", 999).with("foo", "x").with("bogus", "y"))
        .unwrap();

    assert_eq!(id, 1);
    assert_eq!(
        db.select("t", &[1]).unwrap(),
        vec![Row::new().with("ID", 1).with("foo", "x")]
    );
    assert!(db.select("t", &[999]).unwrap().is_empty());
}

#[test]
fn text_criteria_ignore_case_but_do_not_coerce() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["foo", "count"]).unwrap();
    db.insert("t", Row::new().with("foo", "bar").with("count", 5)).unwrap();

    let by_text = db.query_by_values("t", &Criteria::new().with("foo", "Bar"), None).unwrap();
    assert_eq!(by_text, vec![1]);

    let by_string_count = db.query_by_values("t", &Criteria::new().with("count", "5"), None).unwrap();
    assert!(by_string_count.is_empty());

    let by_count = db.query_by_values("t", &Criteria::new().with("count", 5), None).unwrap();
    assert_eq!(by_count, vec![1]);
}

#[test]
fn criteria_fields_are_ored() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["foo", "bar"]).unwrap();
    db.insert("t", Row::new().with("foo", "x").with("bar", "nope")).unwrap();
    db.insert("t", Row::new().with("foo", "q").with("bar", "q")).unwrap();

    let ids = db
        .query_by_values("t", &Criteria::new().with("foo", "x").with("bar", "y"), None)
        .unwrap();
    assert_eq!(ids, vec![1]);
}

#[test]
fn query_limit_and_predicate() {
    let mut db = open(&MemoryStore::new());
    db.create_table("nums", ["n"]).unwrap();
    for n in 1..=10 {
        db.insert("nums", Row::new().with("n", n)).unwrap();
    }

    let even = |row: &Row| row.get("n").and_then(Value::as_i64).is_some_and(|n| n % 2 == 0);
    assert_eq!(db.query_by_predicate("nums", even, None).unwrap(), vec![2, 4, 6, 8, 10]);
    assert_eq!(db.query_by_predicate("nums", even, Some(2)).unwrap(), vec![2, 4]);

    let rows = db.query("nums", &Query::predicate(even), Some(3)).unwrap();
    let ns: Vec<_> = rows.iter().filter_map(|r| r.get("n").and_then(Value::as_i64)).collect();
    assert_eq!(ns, vec![2, 4, 6]);
}

#[test]
fn update_is_full_replace() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["a", "b"]).unwrap();
    db.insert("t", Row::new().with("a", "x").with("b", "y")).unwrap();

    let replaced = db
        .update("t", &[1], |_| Some(Row::new().with("a", "z").with("junk", 1)))
        .unwrap();
    assert_eq!(replaced, 1);

    let row = &db.select("t", &[1]).unwrap()[0];
    assert_eq!(row, &Row::new().with("ID", 1).with("a", "z"));
    assert!(!row.contains("b"));
}

#[test]
fn update_callback_gets_a_copy() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["a"]).unwrap();
    db.insert("t", Row::new().with("a", 1)).unwrap();

    db.update("t", &[1], |mut row| {
        row.set("a", 2);
        None
    })
    .unwrap();
    assert_eq!(db.select("t", &[1]).unwrap()[0].get("a"), Some(&Value::Int64(1)));
}

#[test]
fn update_where_uses_query() {
    let mut db = open(&MemoryStore::new());
    db.create_table("users", ["name", "active"]).unwrap();
    db.insert("users", Row::new().with("name", "Ann").with("active", true)).unwrap();
    db.insert("users", Row::new().with("name", "Bo").with("active", false)).unwrap();

    let replaced = db
        .update_where(
            "users",
            &Query::values(Criteria::new().with("active", false)),
            |mut row| {
                row.set("active", true);
                Some(row)
            },
        )
        .unwrap();
    assert_eq!(replaced, 1);

    let active = db
        .query_by_values("users", &Criteria::new().with("active", true), None)
        .unwrap();
    assert_eq!(active, vec![1, 2]);
}

#[test]
fn schema_operation_errors() {
    let mut db = open(&MemoryStore::new());
    db.create_table("t", ["a"]).unwrap();

    assert_eq!(db.create_table("t", ["b"]), Err(Error::duplicate_table("t")));
    assert_eq!(db.create_table("bad-name", ["a"]), Err(Error::invalid_name("bad-name")));
    assert_eq!(db.create_table("u", ["a b"]), Err(Error::invalid_name("a b")));
    assert_eq!(db.drop_table("nope"), Err(Error::no_such_table("nope")));
    assert_eq!(db.truncate("nope"), Err(Error::no_such_table("nope")));
    assert_eq!(db.row_count("nope"), Err(Error::no_such_table("nope")));

    assert_eq!(db.table_count(), 1);
    assert!(db.table_exists("t"));
    db.drop_table("t").unwrap();
    assert!(!db.table_exists("t"));
    assert_eq!(db.table_count(), 0);
}

#[test]
fn tables_are_introspectable() {
    let mut db = open(&MemoryStore::new());
    db.create_table("b", ["x", "ID"]).unwrap();
    db.create_table("a", Vec::<String>::new()).unwrap();

    assert_eq!(db.table_names(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(db.fields("b").unwrap(), vec!["ID".to_string(), "x".to_string()]);
    assert_eq!(db.fields("a").unwrap(), vec!["ID".to_string()]);
}

#[test]
fn commit_then_reopen_round_trips() {
    let store = MemoryStore::new();
    let mut db = open(&store);
    db.create_table("users", ["name", "age", "score"]).unwrap();
    db.insert("users", Row::new().with("name", "Ann").with("age", 30).with("score", 1.5)).unwrap();
    db.insert("users", Row::new().with("name", "Bo")).unwrap();
    db.create_table("empty", ["x"]).unwrap();
    db.commit().unwrap();

    let reopened = open(&store);
    assert!(!reopened.is_new());
    assert_eq!(reopened.table_names(), db.table_names());
    for table in db.table_names() {
        assert_eq!(reopened.fields(&table).unwrap(), db.fields(&table).unwrap());
        let all = Query::predicate(|_| true);
        assert_eq!(
            reopened.query(&table, &all, None).unwrap(),
            db.query(&table, &all, None).unwrap()
        );
    }

    let mut reopened = reopened;
    assert_eq!(reopened.insert("users", Row::new()).unwrap(), 3);
}

#[test]
fn uncommitted_changes_are_not_persisted() {
    let store = MemoryStore::new();
    let mut db = open(&store);
    db.create_table("t", ["a"]).unwrap();

    let reopened = open(&store);
    assert!(!reopened.table_exists("t"));
}

#[test]
fn drop_removes_blob_and_reopen_is_new() {
    let store = MemoryStore::new();
    let mut db = open(&store);
    db.create_table("t", ["a"]).unwrap();
    db.commit().unwrap();
    assert!(store.contains_key("db_app"));

    db.drop().unwrap();
    assert!(!store.contains_key("db_app"));

    let fresh = open(&store);
    assert!(fresh.is_new());
    assert_eq!(fresh.table_count(), 0);
}

#[test]
fn malformed_blob_is_replaced() {
    let mut store = MemoryStore::new();
    store.set("db_app", br#"{"tables":{}}"#).unwrap();

    let db = open(&store);
    assert!(db.is_new());
    assert_eq!(store.raw("db_app").unwrap(), br#"{"tables":{},"data":{}}"#.to_vec());
}

#[test]
fn undecodable_rows_leave_blob_untouched() {
    let blob = br#"{"tables":{"t":{"fields":["ID","tags"],"auto_increment":2}},"data":{"t":{"1":{"ID":1,"tags":["a","b"]}}}}"#;
    let mut store = MemoryStore::new();
    store.set("db_app", blob).unwrap();

    let err = Database::open(store.clone(), "app").unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
    assert_eq!(store.raw("db_app").unwrap(), blob.to_vec());
    assert_eq!(store.len(), 1);
}

#[test]
fn valid_blob_loads_under_any_name() {
    let mut store = MemoryStore::new();
    store
        .set("db_my-db", br#"{"tables":{"t":{"fields":["ID"],"auto_increment":1}},"data":{"t":{}}}"#)
        .unwrap();

    let db = Database::open(store.clone(), "my-db").unwrap();
    assert!(!db.is_new());
    assert!(db.table_exists("t"));

    assert_eq!(
        Database::open(store, "other-db").unwrap_err(),
        Error::invalid_name("other-db")
    );
}

#[test]
fn key_prefix_is_configurable() {
    let store = MemoryStore::new();
    let config = Config::new().with_key_prefix("tenant1_");
    let db = Database::open_with_config(store.clone(), "app", config).unwrap();
    assert_eq!(db.key(), "tenant1_app");
    assert_eq!(store.keys(), vec!["tenant1_app".to_string()]);
}

#[test]
fn pretty_blobs_reload() {
    let store = MemoryStore::new();
    let config = Config::new().with_pretty(true);
    let mut db = Database::open_with_config(store.clone(), "app", config.clone()).unwrap();
    db.create_table("t", ["a"]).unwrap();
    db.insert("t", Row::new().with("a", "x")).unwrap();
    db.commit().unwrap();

    let raw = String::from_utf8(store.raw("db_app").unwrap()).unwrap();
    assert!(raw.contains('\n'));

    let reopened = Database::open_with_config(store, "app", config).unwrap();
    assert_eq!(reopened.row_count("t").unwrap(), 1);
}

#[test]
fn failed_write_keeps_previous_blob() {
    let mut store = FlakyStore {
        inner: MemoryStore::new(),
        fail_writes: false,
    };
    let mut db = Database::open(&mut store, "app").unwrap();
    db.create_table("t", ["a"]).unwrap();
    db.commit().unwrap();

    db.insert("t", Row::new().with("a", 1)).unwrap();
    drop(db);
    let before = store.inner.raw("db_app");

    store.fail_writes = true;
    let mut db = Database::open(&mut store, "app").unwrap();
    db.insert("t", Row::new().with("a", 2)).unwrap();
    let err = db.commit().unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }));
    drop(db);

    assert_eq!(store.inner.raw("db_app"), before);
}

#[test]
fn creation_fails_when_store_rejects_write() {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        fail_writes: true,
    };
    let err = Database::open(store, "app").unwrap_err();
    assert_eq!(err, Error::persistence("db_app", "quota exceeded"));
}

#[test]
fn unencodable_state_keeps_previous_blob() {
    let store = MemoryStore::new();
    let mut db = open(&store);
    db.create_table("t", ["x"]).unwrap();
    db.commit().unwrap();
    let before = store.raw("db_app");

    db.insert("t", Row::new().with("x", f64::NAN)).unwrap();
    assert!(matches!(db.commit(), Err(Error::Serialization { .. })));
    assert_eq!(store.raw("db_app"), before);
}

/// Two handles on one key are not coordinated: whichever commits last wins,
/// silently discarding the other's changes. This documents the behavior; it
/// is not a guarantee callers should rely on.
#[test]
fn concurrent_handles_last_commit_wins() {
    let store = MemoryStore::new();
    let mut first = open(&store);
    let mut second = open(&store);

    first.create_table("from_first", ["a"]).unwrap();
    second.create_table("from_second", ["a"]).unwrap();
    first.commit().unwrap();
    second.commit().unwrap();

    let reopened = open(&store);
    assert!(reopened.table_exists("from_second"));
    assert!(!reopened.table_exists("from_first"));
}
