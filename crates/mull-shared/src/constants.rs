/// Application name, used for the platform config directory.
pub const APP_NAME: &str = "mull";

/// Canonical relay list endpoint.
pub const DEFAULT_RELAYS_URL: &str = "https://api.mullvad.net/www/relays/all/";

/// Public "am I connected" endpoint.
pub const DEFAULT_CHECK_URL: &str = "https://am.i.mullvad.net/json";

/// The only relay transport kept in the metadata store.
pub const SUPPORTED_RELAY_TYPE: &str = "wireguard";

/// Conf file holding the favorites and local settings.
pub const CONFIG_FILE_NAME: &str = "mull.toml";

/// Default SQLite file name, relative to the mull home directory.
pub const DEFAULT_DATABASE_FILE: &str = "relays.db";

/// File the last query's hostnames are written to.
pub const RESULTS_FILE_NAME: &str = "query_results.txt";

/// Process names treated as torrent clients when no list is configured.
pub const DEFAULT_TORRENT_CLIENTS: [&str; 5] =
    ["qbittorrent", "transmission", "deluge", "fragments", "ktorrent"];

/// Timeout for the relay list download, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Timeout for the connection check, in seconds.
pub const CHECK_TIMEOUT_SECS: u64 = 5;
