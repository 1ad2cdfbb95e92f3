//! # piprbook-shared
//!
//! Entity model, validation predicates, identifier utilities and password
//! hashing shared by the store and client crates.

pub mod constants;
pub mod error;
pub mod identifiers;
pub mod model;
pub mod password;
pub mod validation;

pub use error::ModelError;
pub use model::{Entity, FriendRequest, Message, Photo, User};
