/// Application name
pub const APP_NAME: &str = "piprbook";

/// Number of ASCII letters in a per-user password salt
pub const SALT_LENGTH: usize = 10;

/// Length of a hex-encoded SHA-256 digest
pub const PASSWORD_HASH_LENGTH: usize = 64;

/// Usernames must be strictly longer than this (in characters)
pub const MIN_USERNAME_EXCLUSIVE: usize = 3;

/// Photo formats accepted by [`crate::model::Photo`]
pub const SUPPORTED_PHOTO_FORMATS: [&str; 2] = ["jpg", "png"];

/// Key holding the entity identifier inside every stored record
pub const ID_KEY: &str = "uuid";

/// Collection names used by a default database file
pub const USERS_COLLECTION: &str = "users";
pub const MESSAGES_COLLECTION: &str = "messages";
pub const FRIEND_REQUESTS_COLLECTION: &str = "friend_requests";
pub const PHOTOS_COLLECTION: &str = "photos";

pub const DEFAULT_COLLECTIONS: [&str; 4] = [
    USERS_COLLECTION,
    MESSAGES_COLLECTION,
    FRIEND_REQUESTS_COLLECTION,
    PHOTOS_COLLECTION,
];
