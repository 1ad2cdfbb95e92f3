use std::sync::Arc;

use piprbook_shared::constants::USERS_COLLECTION;
use piprbook_shared::model::User;

use super::UserRepository;
use crate::error::Result;
use crate::serializers::UserSerializer;
use crate::store::Store;

impl<S: Store + ?Sized> UserRepository<S> {
    /// Bind to the `users` collection.
    pub fn with_default_collection(store: Arc<S>) -> Self {
        Self::new(store, UserSerializer, USERS_COLLECTION)
    }

    /// Exact, case-sensitive username match.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.get_all()?.into_iter().find(|u| u.username() == username))
    }

    /// Exact email match. Uniqueness is the caller's business, so with
    /// duplicates any one of them may come back.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.get_all()?.into_iter().find(|u| u.email() == email))
    }

    /// Users whose username contains `fragment` (case-sensitive).
    pub fn get_by_username_fragment(&self, fragment: &str) -> Result<Vec<User>> {
        self.filter(|u| u.username().contains(fragment))
    }
}
