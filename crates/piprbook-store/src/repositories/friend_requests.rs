use std::sync::Arc;

use piprbook_shared::constants::FRIEND_REQUESTS_COLLECTION;
use piprbook_shared::model::{Entity, FriendRequest, User};

use super::FriendRequestRepository;
use crate::error::Result;
use crate::serializers::FriendRequestSerializer;
use crate::store::Store;

impl<S: Store + ?Sized> FriendRequestRepository<S> {
    /// Bind to the `friend_requests` collection.
    pub fn with_default_collection(store: Arc<S>) -> Self {
        Self::new(store, FriendRequestSerializer, FRIEND_REQUESTS_COLLECTION)
    }

    /// Pending requests addressed to `user`, oldest first.
    pub fn get_requests_to_user(&self, user: &User) -> Result<Vec<FriendRequest>> {
        self.sorted(|r| r.to_user_id() == user.id())
    }

    /// Pending requests sent by `user`, oldest first.
    pub fn get_requests_from_user(&self, user: &User) -> Result<Vec<FriendRequest>> {
        self.sorted(|r| r.from_user_id() == user.id())
    }

    fn sorted<P>(&self, predicate: P) -> Result<Vec<FriendRequest>>
    where
        P: Fn(&FriendRequest) -> bool,
    {
        let mut requests = self.filter(predicate)?;
        requests.sort_by_key(FriendRequest::timestamp);
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use piprbook_shared::constants::DEFAULT_COLLECTIONS;

    use super::*;
    use crate::repositories::fixtures::*;
    use crate::MemoryStore;

    const REQUEST_1_ID: &str = "73cf4b5c-8870-11ed-942c-00155d211f36";
    const REQUEST_2_ID: &str = "143e8dd2-8871-11ed-942c-00155d211f36";
    const REQUEST_3_ID: &str = "2a5f7c90-8871-11ed-942c-00155d211f36";

    fn repo() -> FriendRequestRepository<MemoryStore> {
        let store = Arc::new(MemoryStore::new(&DEFAULT_COLLECTIONS));
        let repo = FriendRequestRepository::with_default_collection(store);
        repo.save(&FriendRequest::new(REQUEST_1_ID, at(10, 0), USER_1_ID, USER_3_ID).unwrap())
            .unwrap();
        repo.save(&FriendRequest::new(REQUEST_2_ID, at(11, 0), USER_3_ID, USER_2_ID).unwrap())
            .unwrap();
        repo
    }

    fn ids(requests: &[FriendRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_requests_to_user() {
        let repo = repo();
        assert_eq!(ids(&repo.get_requests_to_user(&user_3()).unwrap()), [REQUEST_1_ID]);
        assert_eq!(ids(&repo.get_requests_to_user(&user_2()).unwrap()), [REQUEST_2_ID]);
        assert!(repo.get_requests_to_user(&user_1()).unwrap().is_empty());
    }

    #[test]
    fn test_requests_from_user() {
        let repo = repo();
        assert_eq!(ids(&repo.get_requests_from_user(&user_1()).unwrap()), [REQUEST_1_ID]);
        assert_eq!(ids(&repo.get_requests_from_user(&user_3()).unwrap()), [REQUEST_2_ID]);
        assert!(repo.get_requests_from_user(&user_2()).unwrap().is_empty());
    }

    #[test]
    fn test_requests_sorted_by_timestamp() {
        let repo = repo();
        // Earlier than REQUEST_2 although saved after it.
        repo.save(&FriendRequest::new(REQUEST_3_ID, at(9, 0), USER_1_ID, USER_2_ID).unwrap())
            .unwrap();

        assert_eq!(
            ids(&repo.get_requests_to_user(&user_2()).unwrap()),
            [REQUEST_3_ID, REQUEST_2_ID]
        );
    }

    #[test]
    fn test_deleted_request_is_gone() {
        let repo = repo();
        let request = repo.get_by_id(REQUEST_1_ID).unwrap().unwrap();
        repo.delete(&request).unwrap();

        assert!(repo.get_by_id(REQUEST_1_ID).unwrap().is_none());
        assert!(repo.get_requests_to_user(&user_3()).unwrap().is_empty());
    }
}
