//! In-process [`Store`] with the same collection rules as [`crate::JsonStore`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::store::{index_records, record_id, Record, Store};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new(collections: &[&str]) -> Self {
        let collections = collections
            .iter()
            .map(|name| (name.to_string(), Map::new()))
            .collect();

        Self {
            collections: Mutex::new(collections),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Map<String, Value>>>> {
        self.collections.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn collection_mut<'a>(
    collections: &'a mut HashMap<String, Map<String, Value>>,
    name: &str,
) -> Result<&'a mut Map<String, Value>> {
    collections
        .get_mut(name)
        .ok_or_else(|| StoreError::CollectionDoesNotExist(name.to_string()))
}

impl Store for MemoryStore {
    fn get_by_id(&self, id: &str, collection: &str) -> Result<Option<Record>> {
        let mut guard = self.lock()?;
        let records = collection_mut(&mut guard, collection)?;
        Ok(records.get(id).and_then(Value::as_object).cloned())
    }

    fn save(&self, record: Record, collection: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let records = collection_mut(&mut guard, collection)?;
        let id = record_id(&record)?.to_string();
        records.insert(id, Value::Object(record));
        Ok(())
    }

    fn delete_by_id(&self, id: &str, collection: &str) -> Result<()> {
        let mut guard = self.lock()?;
        collection_mut(&mut guard, collection)?.remove(id);
        Ok(())
    }

    fn get_collection(&self, collection: &str) -> Result<Vec<Record>> {
        let mut guard = self.lock()?;
        let records = collection_mut(&mut guard, collection)?;
        Ok(records
            .values()
            .filter_map(Value::as_object)
            .cloned()
            .collect())
    }

    fn save_collection(&self, records: Vec<Record>, collection: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let existing = collection_mut(&mut guard, collection)?;
        *existing = index_records(records)?;
        Ok(())
    }
}
