//! Hostnames produced by the last `mull query`, one per line.

use std::path::{Path, PathBuf};

use mull_shared::RelayError;

use crate::error::Result;
use crate::persist::write_atomic;

#[derive(Debug, Clone)]
pub struct ResultCache {
    path: PathBuf,
}

impl ResultCache {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the cache with `hostnames`, keeping their order.
    pub fn save(&self, hostnames: &[String]) -> Result<()> {
        write_atomic(&self.path, &hostnames.join("\n"))?;
        tracing::debug!(count = hostnames.len(), path = %self.path.display(), "query results saved");
        Ok(())
    }

    /// Read the cached hostnames. Fails with `ResultsUnavailable` when the
    /// file is missing or holds no hostnames.
    pub fn load(&self) -> Result<Vec<String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RelayError::ResultsUnavailable(format!(
                    "{} not found, run `mull query` first",
                    self.path.display()
                ))
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        let hostnames: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if hostnames.is_empty() {
            return Err(RelayError::ResultsUnavailable("the last query saved no hostnames".into()).into());
        }
        Ok(hostnames)
    }

    /// Hostname at `index` of the cached results.
    pub fn get(&self, index: i64) -> Result<String> {
        let mut hostnames = self.load()?;
        let len = hostnames.len();
        match usize::try_from(index) {
            Ok(i) if i < len => Ok(hostnames.swap_remove(i)),
            _ => Err(RelayError::out_of_range(index, len).into()),
        }
    }
}
