//! CLI configuration loaded from environment variables.
//!
//! Everything has a default so `mull` runs with zero configuration. The conf
//! file itself (favorites, database path, torrent clients) is read later by
//! [`crate::commands::App`]; only its location is decided here.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use mull_shared::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_CHECK_URL, DEFAULT_RELAYS_URL, RESULTS_FILE_NAME,
};

#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the conf file, results cache and default database.
    /// Env: `MULL_HOME`
    /// Default: the platform config dir for `mull`, else the working directory.
    pub home: PathBuf,

    /// Conf file path.
    /// Env: `MULL_CONFIG`
    /// Default: `<home>/mull.toml`
    pub conf_path: PathBuf,

    /// Overrides `[database] relay_database_path` when set.
    /// Env: `MULL_DATABASE`
    pub database_override: Option<PathBuf>,

    /// Query results cache.
    /// Env: `MULL_RESULTS`
    /// Default: `<home>/query_results.txt`
    pub results_path: PathBuf,

    /// Env: `MULL_RELAYS_URL`
    pub relays_url: String,

    /// Env: `MULL_CHECK_URL`
    pub check_url: String,

    /// Prefix `wg`/`wg-quick` invocations with `sudo`.
    /// Env: `MULL_SUDO` (true/false)
    /// Default: `true`
    pub use_sudo: bool,
}

impl CliConfig {
    fn with_home(home: PathBuf) -> Self {
        Self {
            conf_path: home.join(CONFIG_FILE_NAME),
            results_path: home.join(RESULTS_FILE_NAME),
            home,
            database_override: None,
            relays_url: DEFAULT_RELAYS_URL.to_string(),
            check_url: DEFAULT_CHECK_URL.to_string(),
            use_sudo: true,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through `var`, falling back to defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let home = match var("MULL_HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => default_home(),
        };
        let mut config = Self::with_home(home);

        if let Some(path) = var("MULL_CONFIG") {
            config.conf_path = PathBuf::from(path);
        }

        if let Some(path) = var("MULL_DATABASE") {
            if !path.is_empty() {
                config.database_override = Some(PathBuf::from(path));
            }
        }

        if let Some(path) = var("MULL_RESULTS") {
            config.results_path = PathBuf::from(path);
        }

        if let Some(url) = var("MULL_RELAYS_URL") {
            config.relays_url = url;
        }

        if let Some(url) = var("MULL_CHECK_URL") {
            config.check_url = url;
        }

        if let Some(val) = var("MULL_SUDO") {
            config.use_sudo = val != "false" && val != "0";
        }

        config
    }

    /// Where the relay database lives, given the conf file's setting.
    ///
    /// Relative conf paths are taken relative to `home`.
    pub fn database_path(&self, conf_setting: &str) -> PathBuf {
        match &self.database_override {
            Some(path) => path.clone(),
            None => self.home.join(Path::new(conf_setting)),
        }
    }
}

fn default_home() -> PathBuf {
    match ProjectDirs::from("", "", APP_NAME) {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => {
            tracing::warn!("No home directory found, using the working directory");
            PathBuf::from(".")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn paths_follow_home() {
        let config = config(&[("MULL_HOME", "/tmp/mull-home")]);
        assert_eq!(config.conf_path, PathBuf::from("/tmp/mull-home/mull.toml"));
        assert_eq!(
            config.results_path,
            PathBuf::from("/tmp/mull-home/query_results.txt")
        );
        assert_eq!(
            config.database_path("relays.db"),
            PathBuf::from("/tmp/mull-home/relays.db")
        );
        assert!(config.use_sudo);
        assert_eq!(config.relays_url, DEFAULT_RELAYS_URL);
    }

    #[test]
    fn overrides_apply() {
        let config = config(&[
            ("MULL_HOME", "/tmp/mull-home"),
            ("MULL_CONFIG", "/etc/mull.toml"),
            ("MULL_DATABASE", "/var/lib/mull/relays.db"),
            ("MULL_SUDO", "0"),
            ("MULL_CHECK_URL", "http://127.0.0.1:9/json"),
        ]);
        assert_eq!(config.conf_path, PathBuf::from("/etc/mull.toml"));
        assert_eq!(
            config.database_path("ignored.db"),
            PathBuf::from("/var/lib/mull/relays.db")
        );
        assert!(!config.use_sudo);
        assert_eq!(config.check_url, "http://127.0.0.1:9/json");
    }

    #[test]
    fn absolute_conf_database_path_wins_over_home() {
        let config = config(&[("MULL_HOME", "/tmp/mull-home")]);
        assert_eq!(
            config.database_path("/srv/relays.db"),
            PathBuf::from("/srv/relays.db")
        );
    }
}
