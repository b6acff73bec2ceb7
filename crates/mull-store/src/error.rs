use std::path::PathBuf;

use mull_shared::RelayError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Generic I/O error (e.g. reading a file that exists but is unreadable).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a conf or cache file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A relay lookup by hostname found nothing.
    #[error("Hostname `{0}` not found in the relay database")]
    NotFound(String),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// The conf file is not valid TOML for the expected layout.
    #[error("Config parse error: {0}")]
    ConfParse(#[from] toml::de::Error),

    /// The conf document could not be rendered back to TOML.
    #[error("Config encode error: {0}")]
    ConfEncode(#[from] toml::ser::Error),

    /// Domain error from resolving or editing relays.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
