use piprbook_shared::ModelError;
use piprbook_store::StoreError;
use thiserror::Error;

/// Why a log-in attempt failed.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User {0} does not exist")]
    UserDoesNotExist(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by [`crate::UserService`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Username {0} is already taken by someone else")]
    UsernameTaken(String),

    #[error("There already exists a user with email address {0}")]
    EmailAlreadyUsed(String),

    #[error("Users are already friends")]
    AlreadyFriends,

    /// A friend request refers to a user that is no longer stored.
    #[error("There are no users with given ids")]
    UnknownUsers,

    /// The acting user is not the one logged in.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
