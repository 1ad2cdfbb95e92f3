//! The collection-oriented persistence boundary.
//!
//! Repositories only talk to a [`Store`], so the JSON file backend can be
//! swapped for [`crate::MemoryStore`] (or anything else) without touching
//! them.

use piprbook_shared::constants::ID_KEY;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// The JSON-object form of a single entity.
pub type Record = Map<String, Value>;

/// Keyed storage of records grouped into named collections.
///
/// Every collection maps the record's `uuid` to the record itself. Asking
/// for a collection that was not declared up front is an error
/// ([`StoreError::CollectionDoesNotExist`]), never an empty result.
pub trait Store {
    /// The record stored under `id`, or `None`.
    fn get_by_id(&self, id: &str, collection: &str) -> Result<Option<Record>>;

    /// Insert or overwrite the record under its own `uuid`.
    fn save(&self, record: Record, collection: &str) -> Result<()>;

    /// Remove the record if present. Deleting an absent id is not an error.
    fn delete_by_id(&self, id: &str, collection: &str) -> Result<()>;

    /// All records of a collection, in no particular order.
    fn get_collection(&self, collection: &str) -> Result<Vec<Record>>;

    /// Replace the whole collection with `records`.
    fn save_collection(&self, records: Vec<Record>, collection: &str) -> Result<()>;
}

/// The identifier a record will be stored under.
pub fn record_id(record: &Record) -> Result<&str> {
    record
        .get(ID_KEY)
        .and_then(Value::as_str)
        .ok_or(StoreError::MissingIdentifier)
}

/// Key a batch of records by id, rejecting the batch if any record lacks one.
pub(crate) fn index_records(records: Vec<Record>) -> Result<Map<String, Value>> {
    let mut indexed = Map::new();
    for record in records {
        let id = record_id(&record)?.to_string();
        indexed.insert(id, Value::Object(record));
    }
    Ok(indexed)
}
