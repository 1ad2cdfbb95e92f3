use std::sync::Arc;

use piprbook_shared::constants::MESSAGES_COLLECTION;
use piprbook_shared::model::{Entity, Message, User};

use super::MessageRepository;
use crate::error::Result;
use crate::serializers::MessageSerializer;
use crate::store::Store;

impl<S: Store + ?Sized> MessageRepository<S> {
    /// Bind to the `messages` collection.
    pub fn with_default_collection(store: Arc<S>) -> Self {
        Self::new(store, MessageSerializer, MESSAGES_COLLECTION)
    }

    /// The conversation between two users in either direction, oldest first.
    ///
    /// Argument order does not matter.
    pub fn get_messages(&self, user_a: &User, user_b: &User) -> Result<Vec<Message>> {
        let (a, b) = (user_a.id(), user_b.id());
        let mut messages = self.filter(|m| {
            let (from, to) = (m.from_user_id(), m.to_user_id());
            (from == a && to == b) || (from == b && to == a)
        })?;
        messages.sort_by_key(Message::timestamp);
        Ok(messages)
    }
}
