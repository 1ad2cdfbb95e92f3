//! A [`Store`] persisted in a single JSON file.
//!
//! The file holds one JSON object whose keys are collection names and whose
//! values map entity ids to records:
//!
//! ```json
//! {"users": {}, "messages": {}, "friend_requests": {}, "photos": {}}
//! ```
//!
//! Every call re-reads the whole document, and every mutating call rewrites
//! it in full (truncate, write, `sync_data`). The store assumes it is the
//! only writer of the file; within the process the handle sits behind a
//! mutex so each call is a single critical section.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::store::{index_records, record_id, Record, Store};

type Document = Map<String, Value>;

/// File-backed store over a fixed set of collections.
pub struct JsonStore {
    file: Mutex<File>,
    collections: Vec<String>,
}

impl JsonStore {
    /// Open an existing database file for reading and writing.
    pub fn open(path: impl AsRef<Path>, collections: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                StoreError::InvalidDatabaseFile(format!(
                    "cannot open {} for reading and writing: {e}",
                    path.display()
                ))
            })?;

        tracing::info!(path = %path.display(), "opening database");

        Self::from_file(file, collections)
    }

    /// Create a new database file containing every collection, empty.
    ///
    /// Fails with an I/O error if the file already exists.
    pub fn create(path: impl AsRef<Path>, collections: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        let document: Document = collections
            .iter()
            .map(|name| (name.to_string(), Value::Object(Map::new())))
            .collect();
        write_document(&mut file, &document)?;

        tracing::info!(path = %path.display(), ?collections, "created database");

        Self::from_file(file, collections)
    }

    /// Take ownership of an already open handle.
    ///
    /// The handle must be readable and writable, contain a JSON object, and
    /// that object must hold every name in `collections` as an object.
    pub fn from_file(mut file: File, collections: &[&str]) -> Result<Self> {
        verify_file(&mut file, collections)?;

        Ok(Self {
            file: Mutex::new(file),
            collections: collections.iter().map(|c| c.to_string()).collect(),
        })
    }

    /// Names of the collections this store serves.
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    fn check_collection(&self, collection: &str) -> Result<()> {
        if self.collections.iter().any(|c| c == collection) {
            Ok(())
        } else {
            Err(StoreError::CollectionDoesNotExist(collection.to_string()))
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, File>> {
        self.file.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Read the document, hand the collection to `change`, and rewrite the
    /// file only if `change` reports that it modified something.
    fn update<F>(&self, collection: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>) -> bool,
    {
        self.check_collection(collection)?;
        let mut file = self.lock()?;

        let mut document = read_document(&mut file)?;
        let changed = change(collection_mut(&mut document, collection)?);
        if changed {
            write_document(&mut file, &document)?;
        }
        Ok(())
    }

    fn read_collection(&self, collection: &str) -> Result<Map<String, Value>> {
        self.check_collection(collection)?;
        let mut file = self.lock()?;

        let mut document = read_document(&mut file)?;
        Ok(std::mem::take(collection_mut(&mut document, collection)?))
    }
}

impl Store for JsonStore {
    fn get_by_id(&self, id: &str, collection: &str) -> Result<Option<Record>> {
        let mut records = self.read_collection(collection)?;
        tracing::debug!(collection, id, "get by id");

        match records.remove(id) {
            Some(Value::Object(record)) => Ok(Some(record)),
            Some(_) => Err(StoreError::InvalidDatabaseFile(format!(
                "record {id} in {collection} is not an object"
            ))),
            None => Ok(None),
        }
    }

    fn save(&self, record: Record, collection: &str) -> Result<()> {
        self.check_collection(collection)?;
        let id = record_id(&record)?.to_string();
        tracing::debug!(collection, id = %id, "save");

        self.update(collection, |records| {
            records.insert(id, Value::Object(record));
            true
        })
    }

    fn delete_by_id(&self, id: &str, collection: &str) -> Result<()> {
        tracing::debug!(collection, id, "delete by id");

        self.update(collection, |records| records.remove(id).is_some())
    }

    fn get_collection(&self, collection: &str) -> Result<Vec<Record>> {
        let records = self.read_collection(collection)?;
        tracing::debug!(collection, count = records.len(), "get collection");

        records
            .into_iter()
            .map(|(id, value)| match value {
                Value::Object(record) => Ok(record),
                _ => Err(StoreError::InvalidDatabaseFile(format!(
                    "record {id} in {collection} is not an object"
                ))),
            })
            .collect()
    }

    fn save_collection(&self, records: Vec<Record>, collection: &str) -> Result<()> {
        self.check_collection(collection)?;
        let indexed = index_records(records)?;
        tracing::debug!(collection, count = indexed.len(), "save collection");

        self.update(collection, |existing| {
            *existing = indexed;
            true
        })
    }
}

fn verify_file(file: &mut File, collections: &[&str]) -> Result<()> {
    // ftruncate to the current length is a no-op that needs write access
    let len = file.metadata()?.len();
    file.set_len(len).map_err(|e| {
        StoreError::InvalidDatabaseFile(format!("file must be readable and writable: {e}"))
    })?;

    let mut document = read_document(file).map_err(|e| match e {
        StoreError::Io(io) => {
            StoreError::InvalidDatabaseFile(format!("file must be readable and writable: {io}"))
        }
        StoreError::Json(json) => {
            StoreError::InvalidDatabaseFile(format!("file must be in JSON format: {json}"))
        }
        other => other,
    })?;

    for name in collections {
        collection_mut(&mut document, name)?;
    }
    Ok(())
}

fn read_document(file: &mut File) -> Result<Document> {
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    match serde_json::from_str(&contents)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::InvalidDatabaseFile(
            "top-level JSON value must be an object".to_string(),
        )),
    }
}

fn write_document(file: &mut File, document: &Document) -> Result<()> {
    let bytes = serde_json::to_vec(document)?;

    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(&bytes)?;
    file.flush()?;
    file.sync_data()?;
    Ok(())
}

fn collection_mut<'a>(document: &'a mut Document, name: &str) -> Result<&'a mut Map<String, Value>> {
    document
        .get_mut(name)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            StoreError::InvalidDatabaseFile(format!(
                "JSON must contain all specified collections, {name} is missing or not an object"
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use piprbook_shared::constants::DEFAULT_COLLECTIONS;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    const EMPTY_DB: &str = r#"{"users": {}, "messages": {}, "friend_requests": {}, "photos": {}}"#;

    fn test_store(contents: &str) -> (JsonStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, contents).unwrap();
        let store = JsonStore::open(&path, &DEFAULT_COLLECTIONS).unwrap();
        (store, dir)
    }

    fn db_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("db.json")
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn on_disk(dir: &TempDir) -> Value {
        serde_json::from_str(&fs::read_to_string(db_path(dir)).unwrap()).unwrap()
    }

    #[test]
    fn test_open_rejects_missing_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"{"users": {}, "messages": {}}"#).unwrap();

        let err = JsonStore::open(&path, &DEFAULT_COLLECTIONS).err().unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_open_rejects_collection_that_is_not_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"{"users": []}"#).unwrap();

        let err = JsonStore::open(&path, &["users"]).err().unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_open_accepts_extra_collections() {
        let (store, _dir) = test_store(
            r#"{"users": {}, "messages": {}, "friend_requests": {}, "photos": {}, "other": {}}"#,
        );
        assert_eq!(store.collections().len(), 4);
    }

    #[test]
    fn test_open_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "users: []").unwrap();

        let err = JsonStore::open(&path, &DEFAULT_COLLECTIONS).err().unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_open_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"["users", "messages"]"#).unwrap();

        let err = JsonStore::open(&path, &["users"]).err().unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_open_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonStore::open(dir.path().join("nope.json"), &DEFAULT_COLLECTIONS)
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_from_file_rejects_read_only_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, EMPTY_DB).unwrap();

        let file = File::open(&path).unwrap();
        let err = JsonStore::from_file(file, &DEFAULT_COLLECTIONS).err().unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_from_file_rejects_write_only_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, EMPTY_DB).unwrap();

        let file = OpenOptions::new().write(true).open(&path).unwrap();
        let err = JsonStore::from_file(file, &DEFAULT_COLLECTIONS).err().unwrap();
        assert!(matches!(err, StoreError::InvalidDatabaseFile(_)));
    }

    #[test]
    fn test_create_writes_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = JsonStore::create(&path, &DEFAULT_COLLECTIONS).unwrap();
        assert!(store.get_collection("users").unwrap().is_empty());
        assert_eq!(
            on_disk(&dir),
            json!({"users": {}, "messages": {}, "friend_requests": {}, "photos": {}})
        );
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let (_store, dir) = test_store(EMPTY_DB);
        assert!(JsonStore::create(db_path(&dir), &DEFAULT_COLLECTIONS).is_err());
    }

    #[test]
    fn test_save_and_get() {
        let (store, dir) = test_store(EMPTY_DB);
        let rec = record(json!({"uuid": "u1", "username": "alice"}));

        store.save(rec.clone(), "users").unwrap();

        assert_eq!(store.get_by_id("u1", "users").unwrap(), Some(rec));
        assert_eq!(on_disk(&dir)["users"]["u1"]["username"], "alice");
    }

    #[test]
    fn test_get_missing_is_none() {
        let (store, _dir) = test_store(EMPTY_DB);
        assert_eq!(store.get_by_id("missing", "users").unwrap(), None);
    }

    #[test]
    fn test_unknown_collection_is_error() {
        let (store, _dir) = test_store(EMPTY_DB);
        let rec = record(json!({"uuid": "u1"}));

        assert!(matches!(
            store.get_by_id("u1", "groups"),
            Err(StoreError::CollectionDoesNotExist(name)) if name == "groups"
        ));
        assert!(matches!(
            store.save(rec.clone(), "groups"),
            Err(StoreError::CollectionDoesNotExist(_))
        ));
        assert!(matches!(
            store.delete_by_id("u1", "groups"),
            Err(StoreError::CollectionDoesNotExist(_))
        ));
        assert!(matches!(
            store.get_collection("groups"),
            Err(StoreError::CollectionDoesNotExist(_))
        ));
        assert!(matches!(
            store.save_collection(vec![rec], "groups"),
            Err(StoreError::CollectionDoesNotExist(_))
        ));
    }

    #[test]
    fn test_undeclared_collection_in_file_is_still_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"{"users": {}, "photos": {}}"#).unwrap();

        let store = JsonStore::open(&path, &["users"]).unwrap();
        assert!(matches!(
            store.get_collection("photos"),
            Err(StoreError::CollectionDoesNotExist(_))
        ));
    }

    #[test]
    fn test_save_without_id() {
        let (store, _dir) = test_store(EMPTY_DB);
        let rec = record(json!({"username": "alice"}));

        assert!(matches!(
            store.save(rec, "users"),
            Err(StoreError::MissingIdentifier)
        ));
    }

    #[test]
    fn test_unknown_collection_reported_before_missing_id() {
        let (store, _dir) = test_store(EMPTY_DB);

        assert!(matches!(
            store.save(record(json!({"name": "x"})), "groups"),
            Err(StoreError::CollectionDoesNotExist(name)) if name == "groups"
        ));
        assert!(matches!(
            store.save_collection(vec![record(json!({"name": "x"}))], "groups"),
            Err(StoreError::CollectionDoesNotExist(name)) if name == "groups"
        ));
    }

    #[test]
    fn test_save_overwrites() {
        let (store, _dir) = test_store(EMPTY_DB);
        store
            .save(record(json!({"uuid": "u1", "bio": "first"})), "users")
            .unwrap();
        store
            .save(record(json!({"uuid": "u1", "bio": "second"})), "users")
            .unwrap();

        let stored = store.get_by_id("u1", "users").unwrap().unwrap();
        assert_eq!(stored["bio"], "second");
        assert_eq!(store.get_collection("users").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (store, dir) = test_store(EMPTY_DB);
        store.save(record(json!({"uuid": "u1"})), "users").unwrap();
        let before = on_disk(&dir);

        store.delete_by_id("u2", "users").unwrap();

        assert_eq!(on_disk(&dir), before);
        assert_eq!(store.get_collection("users").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_record() {
        let (store, _dir) = test_store(EMPTY_DB);
        store.save(record(json!({"uuid": "u1"})), "users").unwrap();
        store.save(record(json!({"uuid": "u2"})), "users").unwrap();

        store.delete_by_id("u1", "users").unwrap();

        assert_eq!(store.get_by_id("u1", "users").unwrap(), None);
        assert!(store.get_by_id("u2", "users").unwrap().is_some());
    }

    #[test]
    fn test_save_collection_replaces_contents() {
        let (store, _dir) = test_store(EMPTY_DB);
        store.save(record(json!({"uuid": "old"})), "photos").unwrap();

        store
            .save_collection(
                vec![record(json!({"uuid": "p1"})), record(json!({"uuid": "p2"}))],
                "photos",
            )
            .unwrap();

        let mut ids: Vec<String> = store
            .get_collection("photos")
            .unwrap()
            .iter()
            .map(|r| r["uuid"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_save_collection_without_id_writes_nothing() {
        let (store, dir) = test_store(EMPTY_DB);
        store.save(record(json!({"uuid": "old"})), "photos").unwrap();
        let before = on_disk(&dir);

        let err = store
            .save_collection(vec![record(json!({"uuid": "p1"})), record(json!({}))], "photos")
            .unwrap_err();

        assert!(matches!(err, StoreError::MissingIdentifier));
        assert_eq!(on_disk(&dir), before);
    }

    #[test]
    fn test_collections_are_independent() {
        let (store, dir) = test_store(EMPTY_DB);
        store.save(record(json!({"uuid": "x"})), "users").unwrap();
        store.save(record(json!({"uuid": "x"})), "messages").unwrap();

        store.delete_by_id("x", "users").unwrap();

        assert!(store.get_by_id("x", "messages").unwrap().is_some());
        assert_eq!(on_disk(&dir)["friend_requests"], json!({}));
    }

    #[test]
    fn test_rewrite_shrinks_file() {
        let (store, dir) = test_store(EMPTY_DB);
        let big = "x".repeat(4096);
        store
            .save(record(json!({"uuid": "u1", "bio": big})), "users")
            .unwrap();
        store.delete_by_id("u1", "users").unwrap();

        // a stale tail would make the file unparsable
        assert_eq!(on_disk(&dir)["users"], json!({}));
    }

    #[test]
    fn test_reopen_sees_saved_data() {
        let (store, dir) = test_store(EMPTY_DB);
        store.save(record(json!({"uuid": "u1"})), "users").unwrap();
        drop(store);

        let reopened = JsonStore::open(db_path(&dir), &DEFAULT_COLLECTIONS).unwrap();
        assert!(reopened.get_by_id("u1", "users").unwrap().is_some());
    }
}
