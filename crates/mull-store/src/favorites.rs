//! The ordered favorites list.
//!
//! One [`Favorites`] is built per process from the conf file. Every mutating
//! call either succeeds completely, including rewriting the `[relays]`
//! section, or leaves both the list and the file untouched.

use std::path::{Path, PathBuf};

use mull_shared::{is_integer_literal, is_relay_identifier, RelayError};
use tracing::info;

use crate::conf::ConfFile;
use crate::error::Result;

#[derive(Debug)]
pub struct Favorites {
    path: PathBuf,
    conf: ConfFile,
    relays: Vec<String>,
}

impl Favorites {
    /// Load the favorites from the conf file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conf = ConfFile::load(path)?;
        Ok(Self::from_conf(path, conf))
    }

    /// Wrap an already loaded conf document that lives at `path`.
    pub fn from_conf(path: &Path, conf: ConfFile) -> Self {
        let relays = conf.favorites();
        Self {
            path: path.to_path_buf(),
            conf,
            relays,
        }
    }

    /// `(index, relay)` pairs in list order.
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.relays.iter().map(String::as_str).enumerate()
    }

    pub fn entries(&self) -> &[String] {
        &self.relays
    }

    pub fn len(&self) -> usize {
        self.relays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.relays.first().map(String::as_str)
    }

    /// Relay at `index`; negative or too large indices are out of range.
    pub fn get(&self, index: i64) -> std::result::Result<&str, RelayError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.relays.get(i))
            .map(String::as_str)
            .ok_or_else(|| RelayError::out_of_range(index, self.relays.len()))
    }

    /// Add `relay`, lower-cased, at `position` (list-insert semantics:
    /// negative counts from the end, out of range clamps) or at the end.
    ///
    /// Returns the stored identifier.
    pub fn add(&mut self, relay: &str, position: Option<i64>) -> Result<String> {
        if !is_relay_identifier(relay) {
            return Err(RelayError::InvalidFormat(relay.to_string()).into());
        }
        let relay = relay.to_lowercase();
        if self.relays.iter().any(|r| r.eq_ignore_ascii_case(&relay)) {
            return Err(RelayError::AlreadyExists(relay).into());
        }

        let mut next = self.relays.clone();
        match position {
            Some(pos) => next.insert(insert_index(pos, next.len()), relay.clone()),
            None => next.push(relay.clone()),
        }
        self.commit(next)?;

        info!(relay = %relay, ?position, "favorite added");
        Ok(relay)
    }

    /// Remove by index (integer token) or by identifier.
    ///
    /// Returns the removed identifier.
    pub fn remove(&mut self, token: &str) -> Result<String> {
        let index = if is_integer_literal(token) {
            let len = self.relays.len();
            token
                .parse::<usize>()
                .ok()
                .filter(|i| *i < len)
                .ok_or_else(|| RelayError::out_of_range(token.parse::<i64>().unwrap_or(i64::MAX), len))?
        } else {
            self.relays
                .iter()
                .position(|r| r.eq_ignore_ascii_case(token))
                .ok_or_else(|| RelayError::NotFound(token.to_string()))?
        };

        let mut next = self.relays.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!(relay = %removed, index, "favorite removed");
        Ok(removed)
    }

    /// Exchange the entries at `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;

        let mut next = self.relays.clone();
        next.swap(i, j);
        self.commit(next)?;

        info!(i, j, "favorites swapped");
        Ok(())
    }

    /// Take the entry at `from` out of the list, then insert it at `to` in
    /// the shortened list. Both indices must be valid for the current list.
    ///
    /// Returns the moved identifier.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<String> {
        self.check_index(from)?;
        self.check_index(to)?;

        let mut next = self.relays.clone();
        let relay = next.remove(from);
        next.insert(to, relay.clone());
        self.commit(next)?;

        info!(relay = %relay, from, to, "favorite moved");
        Ok(relay)
    }

    fn check_index(&self, index: usize) -> std::result::Result<(), RelayError> {
        if index < self.relays.len() {
            Ok(())
        } else {
            Err(RelayError::out_of_range(index, self.relays.len()))
        }
    }

    /// Persist `next` and adopt it only once the write succeeded.
    fn commit(&mut self, next: Vec<String>) -> Result<()> {
        let mut conf = self.conf.clone();
        conf.set_favorites(&next);
        conf.save(&self.path)?;

        self.conf = conf;
        self.relays = next;
        Ok(())
    }
}

/// Position used by a list insert at `position` into a list of `len`.
fn insert_index(position: i64, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let idx = if position < 0 {
        (position.saturating_add(len)).max(0)
    } else {
        position.min(len)
    };
    usize::try_from(idx).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn store_with(dir: &tempfile::TempDir, relays: &[&str]) -> Favorites {
        let path = dir.path().join("mull.toml");
        let mut conf = ConfFile::default();
        conf.set_favorites(&relays.iter().map(|r| r.to_string()).collect::<Vec<_>>());
        conf.save(&path).unwrap();
        Favorites::open(&path).unwrap()
    }

    fn on_disk(dir: &tempfile::TempDir) -> Vec<String> {
        ConfFile::load(&dir.path().join("mull.toml")).unwrap().favorites()
    }

    #[test]
    fn add_at_position_then_remove_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["se-mma-wg-001", "us-nyc-wg-002"]);

        favs.add("de-fra-wg-003", Some(1)).unwrap();
        assert_eq!(
            favs.entries(),
            ["se-mma-wg-001", "de-fra-wg-003", "us-nyc-wg-002"]
        );
        assert_eq!(on_disk(&dir), favs.entries());

        assert_eq!(favs.remove("1").unwrap(), "de-fra-wg-003");
        assert_eq!(favs.entries(), ["se-mma-wg-001", "us-nyc-wg-002"]);
        assert_eq!(on_disk(&dir), favs.entries());
    }

    #[test]
    fn add_then_remove_by_name_restores_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["se-mma-wg-001", "us-nyc-wg-002"]);
        let before = favs.entries().to_vec();

        let stored = favs.add("GB-LON-WG-001", None).unwrap();
        assert_eq!(stored, "gb-lon-wg-001");
        assert_eq!(favs.entries().last().unwrap(), "gb-lon-wg-001");

        favs.remove("gb-lon-wg-001").unwrap();
        assert_eq!(favs.entries(), before);
        assert_eq!(on_disk(&dir), before);
    }

    #[test]
    fn add_rejects_duplicates_and_bad_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["se-mma-wg-001"]);

        assert!(matches!(
            favs.add("SE-MMA-WG-001", None),
            Err(StoreError::Relay(RelayError::AlreadyExists(_)))
        ));
        assert!(matches!(
            favs.add("not-a-relay", None),
            Err(StoreError::Relay(RelayError::InvalidFormat(_)))
        ));
        assert_eq!(favs.entries(), ["se-mma-wg-001"]);
    }

    #[test]
    fn add_position_clamps_like_list_insert() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["aa-aaa-wg-001", "bb-bbb-wg-002"]);

        favs.add("cc-ccc-wg-003", Some(99)).unwrap();
        favs.add("dd-ddd-wg-004", Some(-1)).unwrap();
        favs.add("ee-eee-wg-005", Some(-99)).unwrap();
        assert_eq!(
            favs.entries(),
            [
                "ee-eee-wg-005",
                "aa-aaa-wg-001",
                "bb-bbb-wg-002",
                "dd-ddd-wg-004",
                "cc-ccc-wg-003",
            ]
        );
    }

    #[test]
    fn remove_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["se-mma-wg-001"]);

        assert!(matches!(
            favs.remove("1"),
            Err(StoreError::Relay(RelayError::IndexOutOfRange { index: 1, len: 1 }))
        ));
        assert!(matches!(
            favs.remove("-1"),
            Err(StoreError::Relay(RelayError::IndexOutOfRange { index: -1, .. }))
        ));
        assert!(matches!(
            favs.remove("us-nyc-wg-002"),
            Err(StoreError::Relay(RelayError::NotFound(_)))
        ));
        assert!(matches!(
            favs.remove("garbage"),
            Err(StoreError::Relay(RelayError::NotFound(_)))
        ));
        assert_eq!(favs.len(), 1);
    }

    #[test]
    fn swap_is_its_own_inverse() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["aa-aaa-wg-001", "bb-bbb-wg-002", "cc-ccc-wg-003"]);
        let before = favs.entries().to_vec();

        favs.swap(0, 2).unwrap();
        assert_eq!(favs.entries(), ["cc-ccc-wg-003", "bb-bbb-wg-002", "aa-aaa-wg-001"]);
        favs.swap(0, 2).unwrap();
        assert_eq!(favs.entries(), before);

        assert!(matches!(
            favs.swap(0, 3),
            Err(StoreError::Relay(RelayError::IndexOutOfRange { index: 3, len: 3 }))
        ));
        assert_eq!(on_disk(&dir), before);
    }

    #[test]
    fn move_removes_before_inserting() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(
            &dir,
            &["aa-aaa-wg-001", "bb-bbb-wg-002", "cc-ccc-wg-003", "dd-ddd-wg-004"],
        );
        let before = favs.entries().to_vec();

        // "aa" leaves index 0, then lands at index 2 of [bb, cc, dd]
        favs.move_entry(0, 2).unwrap();
        assert_eq!(
            favs.entries(),
            ["bb-bbb-wg-002", "cc-ccc-wg-003", "aa-aaa-wg-001", "dd-ddd-wg-004"]
        );
        assert_eq!(on_disk(&dir), favs.entries());

        favs.move_entry(2, 0).unwrap();
        assert_eq!(favs.entries(), before);

        favs.move_entry(3, 1).unwrap();
        favs.move_entry(1, 3).unwrap();
        assert_eq!(favs.entries(), before);
    }

    #[test]
    fn move_rejects_invalid_indices() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = store_with(&dir, &["aa-aaa-wg-001", "bb-bbb-wg-002"]);

        assert!(favs.move_entry(2, 0).is_err());
        assert!(favs.move_entry(0, 2).is_err());
        assert_eq!(favs.entries(), ["aa-aaa-wg-001", "bb-bbb-wg-002"]);
    }

    #[test]
    fn get_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let favs = store_with(&dir, &["aa-aaa-wg-001"]);

        assert_eq!(favs.get(0).unwrap(), "aa-aaa-wg-001");
        assert_eq!(
            favs.get(1),
            Err(RelayError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(favs.get(-1).is_err());
    }

    #[test]
    fn failed_write_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // the conf path is a directory, so the rename over it fails
        let path = dir.path().join("mull.toml");
        std::fs::create_dir(&path).unwrap();
        let mut favs = Favorites::from_conf(&path, ConfFile::default());

        assert!(matches!(
            favs.add("se-mma-wg-001", None),
            Err(StoreError::Persist { .. })
        ));
        assert!(favs.is_empty());
    }

    #[test]
    fn insert_index_semantics() {
        assert_eq!(insert_index(0, 0), 0);
        assert_eq!(insert_index(5, 2), 2);
        assert_eq!(insert_index(-1, 3), 2);
        assert_eq!(insert_index(-10, 3), 0);
        assert_eq!(insert_index(i64::MIN, 3), 0);
    }
}
