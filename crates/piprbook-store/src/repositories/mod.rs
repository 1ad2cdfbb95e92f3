//! Typed facades over a [`Store`].
//!
//! A [`Repository`] binds a shared store, a serializer and one collection
//! name. The entity-specific queries live in the submodules as inherent
//! impls on the concrete instantiations ([`UserRepository`] and friends).
//! Lookups that find nothing return `None`; store errors pass through
//! untouched.

mod friend_requests;
mod messages;
mod photos;
mod users;

use std::sync::Arc;

use piprbook_shared::model::Entity;

use crate::error::Result;
use crate::serializers::{
    FriendRequestSerializer, MessageSerializer, PhotoSerializer, Serializer, UserSerializer,
};
use crate::store::Store;

pub type UserRepository<S> = Repository<S, UserSerializer>;
pub type MessageRepository<S> = Repository<S, MessageSerializer>;
pub type FriendRequestRepository<S> = Repository<S, FriendRequestSerializer>;
pub type PhotoRepository<S> = Repository<S, PhotoSerializer>;

pub struct Repository<S: ?Sized, Z> {
    store: Arc<S>,
    serializer: Z,
    collection: String,
}

impl<S: Store + ?Sized, Z: Serializer> Repository<S, Z> {
    pub fn new(store: Arc<S>, serializer: Z, collection: impl Into<String>) -> Self {
        Self {
            store,
            serializer,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create or overwrite the entity under its id.
    pub fn save(&self, entity: &Z::Entity) -> Result<()> {
        let record = self.serializer.to_json(entity);
        self.store.save(record, &self.collection)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Z::Entity>> {
        self.store
            .get_by_id(id, &self.collection)?
            .map(|record| self.serializer.from_json(&record))
            .transpose()
    }

    /// Remove the entity; a no-op if it was never stored.
    pub fn delete(&self, entity: &Z::Entity) -> Result<()> {
        self.store.delete_by_id(entity.id(), &self.collection)
    }

    pub fn get_all(&self) -> Result<Vec<Z::Entity>> {
        self.store
            .get_collection(&self.collection)?
            .iter()
            .map(|record| self.serializer.from_json(record))
            .collect()
    }

    /// Every stored entity matching `predicate`, in store order.
    pub(crate) fn filter<P>(&self, predicate: P) -> Result<Vec<Z::Entity>>
    where
        P: Fn(&Z::Entity) -> bool,
    {
        let mut entities = self.get_all()?;
        entities.retain(|entity| predicate(entity));
        Ok(entities)
    }
}

impl<S: ?Sized, Z: Clone> Clone for Repository<S, Z> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            serializer: self.serializer.clone(),
            collection: self.collection.clone(),
        }
    }
}
