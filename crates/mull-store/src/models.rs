//! Relay metadata as persisted in the local SQLite store.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RelayRecord
// ---------------------------------------------------------------------------

/// One known relay. The primary key is the hostname.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayRecord {
    /// Relay identifier, e.g. `se-mma-wg-001`.
    pub hostname: String,
    /// Two-letter country code.
    pub country_code: String,
    pub country_name: String,
    /// Three-letter city code.
    pub city_code: String,
    /// City name with accents stripped (`Malmo`, not `Malmö`).
    pub city_name: String,
    pub fqdn: String,
    pub active: bool,
    pub owned: bool,
    pub provider: String,
    pub ipv4_addr_in: String,
    pub ipv6_addr_in: Option<String>,
    /// Port speed in Gbit/s.
    pub network_port_speed: i64,
    /// Whether the relay boots from the alternate (stboot) image.
    pub stboot: bool,
    pub pubkey: String,
    pub multihop_port: Option<i64>,
    pub socks_name: Option<String>,
    pub socks_port: Option<i64>,
    pub daita: bool,
    /// Always `wireguard`; other transports are filtered out on refresh.
    pub relay_type: String,
    /// `[timestamp] message`, or empty.
    pub status_messages: String,
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Every column of the `relays` table.
///
/// This is the only source of column names that ever reach SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Hostname,
    CountryCode,
    CountryName,
    CityCode,
    CityName,
    Fqdn,
    Active,
    Owned,
    Provider,
    Ipv4AddrIn,
    Ipv6AddrIn,
    NetworkPortSpeed,
    Stboot,
    Pubkey,
    MultihopPort,
    SocksName,
    SocksPort,
    Daita,
    Type,
    StatusMessages,
}

impl Column {
    /// All columns, in table order.
    pub const ALL: [Column; 20] = [
        Column::Hostname,
        Column::CountryCode,
        Column::CountryName,
        Column::CityCode,
        Column::CityName,
        Column::Fqdn,
        Column::Active,
        Column::Owned,
        Column::Provider,
        Column::Ipv4AddrIn,
        Column::Ipv6AddrIn,
        Column::NetworkPortSpeed,
        Column::Stboot,
        Column::Pubkey,
        Column::MultihopPort,
        Column::SocksName,
        Column::SocksPort,
        Column::Daita,
        Column::Type,
        Column::StatusMessages,
    ];

    /// Columns shown by `info` and `query` without `--verbose`.
    pub const SUMMARY: [Column; 7] = [
        Column::Hostname,
        Column::CountryName,
        Column::CityName,
        Column::Active,
        Column::Owned,
        Column::Daita,
        Column::StatusMessages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Hostname => "hostname",
            Column::CountryCode => "country_code",
            Column::CountryName => "country_name",
            Column::CityCode => "city_code",
            Column::CityName => "city_name",
            Column::Fqdn => "fqdn",
            Column::Active => "active",
            Column::Owned => "owned",
            Column::Provider => "provider",
            Column::Ipv4AddrIn => "ipv4_addr_in",
            Column::Ipv6AddrIn => "ipv6_addr_in",
            Column::NetworkPortSpeed => "network_port_speed",
            Column::Stboot => "stboot",
            Column::Pubkey => "pubkey",
            Column::MultihopPort => "multihop_port",
            Column::SocksName => "socks_name",
            Column::SocksPort => "socks_port",
            Column::Daita => "daita",
            Column::Type => "type",
            Column::StatusMessages => "status_messages",
        }
    }

    /// Comma-separated list of every column, for `SELECT` clauses.
    pub fn select_list() -> String {
        Column::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl RelayRecord {
    /// Render one column for display. Booleans print as `0`/`1`, missing
    /// values as `None`.
    pub fn display_value(&self, column: Column) -> String {
        fn flag(b: bool) -> String {
            u8::from(b).to_string()
        }
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "None".to_string(), T::to_string)
        }

        match column {
            Column::Hostname => self.hostname.clone(),
            Column::CountryCode => self.country_code.clone(),
            Column::CountryName => self.country_name.clone(),
            Column::CityCode => self.city_code.clone(),
            Column::CityName => self.city_name.clone(),
            Column::Fqdn => self.fqdn.clone(),
            Column::Active => flag(self.active),
            Column::Owned => flag(self.owned),
            Column::Provider => self.provider.clone(),
            Column::Ipv4AddrIn => self.ipv4_addr_in.clone(),
            Column::Ipv6AddrIn => opt(&self.ipv6_addr_in),
            Column::NetworkPortSpeed => self.network_port_speed.to_string(),
            Column::Stboot => flag(self.stboot),
            Column::Pubkey => self.pubkey.clone(),
            Column::MultihopPort => opt(&self.multihop_port),
            Column::SocksName => opt(&self.socks_name),
            Column::SocksPort => opt(&self.socks_port),
            Column::Daita => flag(self.daita),
            Column::Type => self.relay_type.clone(),
            Column::StatusMessages => self.status_messages.clone(),
        }
    }
}
