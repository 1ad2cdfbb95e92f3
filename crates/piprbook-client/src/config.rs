//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so the client starts with no configuration
//! at all.

use std::path::PathBuf;

use directories::ProjectDirs;
use piprbook_shared::constants::APP_NAME;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "piprbook_client=debug,piprbook_store=info,warn";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// JSON database file.
    /// Env: `PIPRBOOK_DATABASE`
    /// Default: `piprbook.json` in the platform data directory:
    /// - Linux:   `~/.local/share/piprbook/piprbook.json`
    /// - macOS:   `~/Library/Application Support/com.piprbook.piprbook/piprbook.json`
    /// - Windows: `{FOLDERID_RoamingAppData}\piprbook\piprbook\data\piprbook.json`
    ///
    /// Falls back to `./piprbook.json` when no home directory is known.
    pub database_path: PathBuf,

    /// Create an empty database when the file does not exist yet.
    /// Env: `PIPRBOOK_CREATE_DB` (true/false)
    /// Default: `true`
    pub create_if_missing: bool,

    /// Tracing filter directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            create_if_missing: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("PIPRBOOK_DATABASE") {
            if path.is_empty() {
                tracing::warn!("Empty PIPRBOOK_DATABASE, using default");
            } else {
                config.database_path = PathBuf::from(path);
            }
        }

        if let Ok(val) = std::env::var("PIPRBOOK_CREATE_DB") {
            match parse_flag(&val) {
                Some(flag) => config.create_if_missing = flag,
                None => {
                    tracing::warn!(
                        value = %val,
                        "Invalid PIPRBOOK_CREATE_DB, using default"
                    );
                }
            }
        }

        // RUST_LOG is read by tracing-subscriber's EnvFilter directly.

        config
    }
}

fn default_database_path() -> PathBuf {
    let file_name = format!("{APP_NAME}.json");
    match ProjectDirs::from("com", APP_NAME, APP_NAME) {
        Some(dirs) => dirs.data_dir().join(file_name),
        None => PathBuf::from(".").join(file_name),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
