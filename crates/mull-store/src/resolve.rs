//! Turns a [`RelayRef`] into a relay identifier.
//!
//! Precedence is fixed by [`RelayRef::from_args`]: a results index beats a
//! direct token, which beats nothing. The literal path returns the token
//! unvalidated; callers check the shape where they need it.

use mull_shared::RelayRef;

use crate::error::Result;
use crate::favorites::Favorites;
use crate::results::ResultCache;

pub struct Resolver<'a> {
    favorites: &'a Favorites,
    results: &'a ResultCache,
}

impl<'a> Resolver<'a> {
    pub fn new(favorites: &'a Favorites, results: &'a ResultCache) -> Self {
        Self { favorites, results }
    }

    /// Resolve `target`. `Ok(None)` means nothing was specified.
    pub fn resolve(&self, target: &RelayRef) -> Result<Option<String>> {
        let relay = match target {
            RelayRef::ResultsIndex(idx) => self.results.get(*idx)?,
            RelayRef::FavoritesIndex(idx) => self.favorites.get(*idx)?.to_string(),
            RelayRef::Literal(relay) => relay.clone(),
            RelayRef::Unspecified => return Ok(None),
        };
        tracing::debug!(%target, %relay, "resolved relay");
        Ok(Some(relay))
    }

    pub fn favorites(&self) -> &Favorites {
        self.favorites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::ConfFile;
    use crate::error::StoreError;
    use mull_shared::RelayError;

    struct Fixture {
        _dir: tempfile::TempDir,
        favorites: Favorites,
        results: ResultCache,
    }

    fn fixture(saved_results: Option<&[&str]>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let conf_path = dir.path().join("mull.toml");
        let mut conf = ConfFile::default();
        conf.set_favorites(&["se-mma-wg-001".to_string(), "us-nyc-wg-002".to_string()]);

        let results = ResultCache::new(&dir.path().join("query_results.txt"));
        if let Some(list) = saved_results {
            results
                .save(&list.iter().map(|h| h.to_string()).collect::<Vec<_>>())
                .unwrap();
        }

        Fixture {
            favorites: Favorites::from_conf(&conf_path, conf),
            results,
            _dir: dir,
        }
    }

    #[test]
    fn results_index_wins_over_token() {
        let f = fixture(Some(&["fr-par-wg-001", "gb-lon-wg-002"]));
        let resolver = Resolver::new(&f.favorites, &f.results);

        let target = RelayRef::from_args(Some("0"), Some(1));
        assert_eq!(
            resolver.resolve(&target).unwrap().as_deref(),
            Some("gb-lon-wg-002")
        );
    }

    #[test]
    fn favorites_index_and_literal() {
        let f = fixture(None);
        let resolver = Resolver::new(&f.favorites, &f.results);

        assert_eq!(
            resolver.resolve(&RelayRef::FavoritesIndex(1)).unwrap().as_deref(),
            Some("us-nyc-wg-002")
        );
        // literals are passed through without a shape check
        assert_eq!(
            resolver
                .resolve(&RelayRef::Literal("whatever".into()))
                .unwrap()
                .as_deref(),
            Some("whatever")
        );
        assert_eq!(resolver.resolve(&RelayRef::Unspecified).unwrap(), None);
    }

    #[test]
    fn out_of_range_and_missing_results() {
        let f = fixture(None);
        let resolver = Resolver::new(&f.favorites, &f.results);

        assert!(matches!(
            resolver.resolve(&RelayRef::FavoritesIndex(2)),
            Err(StoreError::Relay(RelayError::IndexOutOfRange { index: 2, len: 2 }))
        ));
        assert!(matches!(
            resolver.resolve(&RelayRef::ResultsIndex(0)),
            Err(StoreError::Relay(RelayError::ResultsUnavailable(_)))
        ));
    }
}
