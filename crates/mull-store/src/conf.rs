//! The `mull.toml` conf document.
//!
//! ```toml
//! [database]
//! relay_database_path = "relays.db"
//!
//! [relays]
//! 0 = "se-mma-wg-001"
//! 1 = "us-nyc-wg-002"
//!
//! [torrent]
//! torrent_clients = "qbittorrent|transmission"
//! ```
//!
//! `[relays]` is keyed by list position; it is rewritten wholesale whenever
//! the favorites change.

use std::collections::BTreeMap;
use std::path::Path;

use mull_shared::constants::{DEFAULT_DATABASE_FILE, DEFAULT_TORRENT_CLIENTS};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::persist::write_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub relay_database_path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            relay_database_path: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentSection {
    /// `|`-separated process names.
    pub torrent_clients: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseSection>,

    #[serde(default)]
    pub relays: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torrent: Option<TorrentSection>,
}

impl ConfFile {
    /// Read the conf file. A missing file yields an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no conf file yet");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the whole document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string(self)?;
        write_atomic(path, &text)
    }

    /// Fill in the `[database]` section if it is missing. Returns `true` when
    /// the document changed.
    pub fn ensure_database_section(&mut self) -> bool {
        if self.database.is_some() {
            return false;
        }
        self.database = Some(DatabaseSection::default());
        true
    }

    /// Favorites in list order. Keys that are not non-negative integers are
    /// skipped.
    pub fn favorites(&self) -> Vec<String> {
        let mut entries: Vec<(usize, &String)> = self
            .relays
            .iter()
            .filter_map(|(key, relay)| match key.trim().parse::<usize>() {
                Ok(pos) => Some((pos, relay)),
                Err(_) => {
                    warn!(key = %key, "ignoring non-numeric key in [relays]");
                    None
                }
            })
            .collect();
        entries.sort_by_key(|(pos, _)| *pos);
        entries.into_iter().map(|(_, r)| r.clone()).collect()
    }

    /// Replace `[relays]` with `list`, keyed `0..n`.
    pub fn set_favorites(&mut self, list: &[String]) {
        self.relays = list
            .iter()
            .enumerate()
            .map(|(i, relay)| (i.to_string(), relay.clone()))
            .collect();
    }

    /// Torrent client process names, or the built-in list.
    pub fn torrent_clients(&self) -> Vec<String> {
        match &self.torrent {
            Some(section) => section
                .torrent_clients
                .split('|')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_TORRENT_CLIENTS.iter().map(|c| c.to_string()).collect(),
        }
    }
}
