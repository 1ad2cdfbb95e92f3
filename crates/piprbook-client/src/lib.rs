//! # piprbook-client
//!
//! The user-facing layer of Piprbook: configuration, session handling and
//! the [`UserService`] that front ends call into.

pub mod auth;
pub mod config;
pub mod error;
pub mod service;

use std::sync::Arc;

use piprbook_shared::constants::DEFAULT_COLLECTIONS;
use piprbook_store::JsonStore;
use tracing_subscriber::{fmt, EnvFilter};

pub use auth::Authentication;
pub use config::ClientConfig;
pub use error::{AuthError, ClientError, Result};
pub use service::UserService;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over [`ClientConfig::log_filter`]. Panics if a global
/// subscriber is already set.
pub fn init_tracing(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Open the configured database file, creating it (and its parent
/// directories) first when allowed.
pub fn open_database(config: &ClientConfig) -> Result<JsonStore> {
    let path = &config.database_path;

    if config.create_if_missing && !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        return Ok(JsonStore::create(path, &DEFAULT_COLLECTIONS)?);
    }

    Ok(JsonStore::open(path, &DEFAULT_COLLECTIONS)?)
}

/// Open the configured database and wire a [`UserService`] over it.
pub fn open_service(config: &ClientConfig) -> Result<UserService<JsonStore>> {
    let store = open_database(config)?;
    tracing::info!(path = %config.database_path.display(), "Piprbook ready");
    Ok(UserService::new(Arc::new(store)))
}
