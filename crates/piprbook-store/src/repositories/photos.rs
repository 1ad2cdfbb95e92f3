use std::sync::Arc;

use piprbook_shared::constants::PHOTOS_COLLECTION;

use super::PhotoRepository;
use crate::serializers::PhotoSerializer;
use crate::store::Store;

impl<S: Store + ?Sized> PhotoRepository<S> {
    /// Bind to the `photos` collection.
    pub fn with_default_collection(store: Arc<S>) -> Self {
        Self::new(store, PhotoSerializer, PHOTOS_COLLECTION)
    }
}
