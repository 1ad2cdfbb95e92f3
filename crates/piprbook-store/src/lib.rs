//! # piprbook-store
//!
//! Persistence for the Piprbook application, backed by a single JSON file.
//!
//! The file holds one object per collection, each mapping an entity's
//! `uuid` to its record. [`JsonStore`] owns the file handle and rewrites the
//! whole document on every change; [`MemoryStore`] implements the same
//! [`Store`] contract in process. Typed [`Repository`] facades pair a store
//! with a [`Serializer`] and add the domain queries.

pub mod json_store;
pub mod memory;
pub mod repositories;
pub mod serializers;
pub mod store;

mod error;

pub use error::{RepresentationError, Result, StoreError};
pub use json_store::JsonStore;
pub use memory::MemoryStore;
pub use repositories::{
    FriendRequestRepository, MessageRepository, PhotoRepository, Repository, UserRepository,
};
pub use serializers::{
    FriendRequestSerializer, MessageSerializer, PhotoSerializer, Serializer, UserSerializer,
};
pub use store::{Record, Store};
