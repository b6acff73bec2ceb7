use std::fs;
use std::path::Path;

use crate::error::{Result, StoreError};

/// Replace `path` with `contents` by writing a sibling temp file and renaming
/// it over the target.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let persist_err = |source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persist_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, contents).map_err(persist_err)?;
    fs::rename(tmp, path).map_err(persist_err)?;
    Ok(())
}
