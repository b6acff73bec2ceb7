//! v001 -- Initial schema creation.
//!
//! Creates the `relays` table. Hostname is the primary key; every refresh
//! replaces rows by hostname.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS relays (
    hostname           TEXT PRIMARY KEY NOT NULL,  -- se-mma-wg-001
    country_code       TEXT,
    country_name       TEXT,
    city_code          TEXT,
    city_name          TEXT,                       -- accent-normalised
    fqdn               TEXT,
    active             INTEGER CHECK(active IN (0, 1)),
    owned              INTEGER CHECK(owned IN (0, 1)),
    provider           TEXT,
    ipv4_addr_in       TEXT,
    ipv6_addr_in       TEXT,
    network_port_speed INTEGER,
    stboot             INTEGER CHECK(stboot IN (0, 1)),
    pubkey             TEXT,
    multihop_port      INTEGER,
    socks_name         TEXT,
    socks_port         INTEGER,
    daita              INTEGER CHECK(daita IN (0, 1)),
    type               TEXT CHECK(type IN ('wireguard')),
    status_messages    TEXT
);

CREATE INDEX IF NOT EXISTS idx_relays_country ON relays(country_code);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
