//! CRUD operations for [`RelayRecord`] rows.

use rusqlite::{params, params_from_iter};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::filter::QueryFilter;
use crate::models::{Column, RelayRecord};

impl Database {
    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Insert or replace every record by hostname in a single transaction.
    ///
    /// Returns the number of rows written.
    pub fn replace_relays(&mut self, relays: &[RelayRecord]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR REPLACE INTO relays ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                         ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                Column::select_list()
            ))?;

            for r in relays {
                stmt.execute(params![
                    r.hostname,
                    r.country_code,
                    r.country_name,
                    r.city_code,
                    r.city_name,
                    r.fqdn,
                    r.active,
                    r.owned,
                    r.provider,
                    r.ipv4_addr_in,
                    r.ipv6_addr_in,
                    r.network_port_speed,
                    r.stboot,
                    r.pubkey,
                    r.multihop_port,
                    r.socks_name,
                    r.socks_port,
                    r.daita,
                    r.relay_type,
                    r.status_messages,
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(count = relays.len(), "relay metadata replaced");
        Ok(relays.len())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single relay by hostname.
    pub fn get_relay(&self, hostname: &str) -> Result<RelayRecord> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {} FROM relays WHERE hostname = ?1",
                    Column::select_list()
                ),
                params![hostname],
                row_to_relay,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(hostname.to_string()),
                other => StoreError::Sqlite(other),
            })
    }

    /// Number of relays currently stored.
    pub fn relay_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM relays", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Run a filter query, ordered by hostname.
    ///
    /// Fails with `EmptyQuery` when the filter has no criteria. An empty
    /// result is returned as an empty `Vec`.
    pub fn query_relays(&self, filter: &QueryFilter) -> Result<Vec<RelayRecord>> {
        let compiled = crate::filter::compile(filter)?;

        let sql = format!(
            "SELECT {} FROM relays WHERE {} ORDER BY hostname ASC",
            Column::select_list(),
            compiled.predicate()
        );
        tracing::debug!(%sql, params = compiled.params().len(), "running relay query");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(compiled.params()), row_to_relay)?;

        let mut relays = Vec::new();
        for row in rows {
            relays.push(row?);
        }
        Ok(relays)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` selected with [`Column::select_list`] to a
/// [`RelayRecord`].
fn row_to_relay(row: &rusqlite::Row<'_>) -> rusqlite::Result<RelayRecord> {
    Ok(RelayRecord {
        hostname: row.get(0)?,
        country_code: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        country_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        city_code: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        city_name: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        fqdn: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        active: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
        owned: row.get::<_, Option<bool>>(7)?.unwrap_or(false),
        provider: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        ipv4_addr_in: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        ipv6_addr_in: row.get(10)?,
        network_port_speed: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
        stboot: row.get::<_, Option<bool>>(12)?.unwrap_or(false),
        pubkey: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
        multihop_port: row.get(14)?,
        socks_name: row.get(15)?,
        socks_port: row.get(16)?,
        daita: row.get::<_, Option<bool>>(17)?.unwrap_or(false),
        relay_type: row.get::<_, Option<String>>(18)?.unwrap_or_default(),
        status_messages: row.get::<_, Option<String>>(19)?.unwrap_or_default(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mull_shared::RelayError;

    pub(crate) fn relay(hostname: &str, country: (&str, &str), city: (&str, &str)) -> RelayRecord {
        RelayRecord {
            hostname: hostname.to_string(),
            country_code: country.0.to_string(),
            country_name: country.1.to_string(),
            city_code: city.0.to_string(),
            city_name: city.1.to_string(),
            fqdn: format!("{hostname}.relays.mullvad.net"),
            active: true,
            owned: false,
            provider: "M247".to_string(),
            ipv4_addr_in: "185.65.135.1".to_string(),
            ipv6_addr_in: Some("2a03:1b20:1:f011::a01f".to_string()),
            network_port_speed: 10,
            stboot: true,
            pubkey: "aBcD=".to_string(),
            multihop_port: Some(3001),
            socks_name: None,
            socks_port: Some(1080),
            daita: false,
            relay_type: "wireguard".to_string(),
            status_messages: String::new(),
        }
    }

    pub(crate) fn seeded_db(dir: &tempfile::TempDir) -> Database {
        let mut db = Database::open_at(&dir.path().join("relays.db")).unwrap();

        let mut nyc = relay("us-nyc-wg-301", ("us", "USA"), ("nyc", "New York, NY"));
        nyc.owned = true;
        nyc.daita = true;
        let mut par = relay("fr-par-wg-001", ("fr", "France"), ("par", "Paris"));
        par.provider = "xtom".to_string();
        let mut arn = relay("se-sto-wg-003", ("se", "Sweden"), ("sto", "Stockholm"));
        arn.active = false;
        let gb = relay("gb-lon-wg-001", ("gb", "UK"), ("lon", "London"));
        let ae = relay("ae-dxb-wg-001", ("ae", "United Arab Emirates"), ("dxb", "Dubai"));

        db.replace_relays(&[nyc, par, arn, gb, ae]).unwrap();
        db
    }

    #[test]
    fn replace_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        assert_eq!(db.relay_count().unwrap(), 5);
        let nyc = db.get_relay("us-nyc-wg-301").unwrap();
        assert_eq!(nyc.city_name, "New York, NY");
        assert!(nyc.owned);
        assert_eq!(nyc.socks_name, None);
        assert_eq!(nyc.multihop_port, Some(3001));
    }

    #[test]
    fn replace_is_by_primary_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = seeded_db(&dir);

        let mut updated = relay("fr-par-wg-001", ("fr", "France"), ("par", "Paris"));
        updated.active = false;
        db.replace_relays(&[updated]).unwrap();

        assert_eq!(db.relay_count().unwrap(), 5);
        assert!(!db.get_relay("fr-par-wg-001").unwrap().active);
    }

    #[test]
    fn missing_hostname_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        assert!(matches!(
            db.get_relay("xx-xxx-wg-999"),
            Err(StoreError::NotFound(h)) if h == "xx-xxx-wg-999"
        ));
    }

    #[test]
    fn query_by_country_code() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let rows = db
            .query_relays(&QueryFilter {
                country: Some("US".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hostname, "us-nyc-wg-301");
    }

    #[test]
    fn query_by_partial_country_name() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        // "united" hits United Arab Emirates but not "UK"
        let rows = db
            .query_relays(&QueryFilter {
                country: Some("UNITED".into()),
                ..Default::default()
            })
            .unwrap();
        let hosts: Vec<_> = rows.iter().map(|r| r.hostname.as_str()).collect();
        assert_eq!(hosts, ["ae-dxb-wg-001"]);
    }

    #[test]
    fn query_by_city_code_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let by_code = db
            .query_relays(&QueryFilter {
                city: Some("sto".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].hostname, "se-sto-wg-003");

        let by_name = db
            .query_relays(&QueryFilter {
                city: Some("york".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].hostname, "us-nyc-wg-301");
    }

    #[test]
    fn query_combines_with_and() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let rows = db
            .query_relays(&QueryFilter {
                active: Some(true),
                provider: Some("m247".into()),
                ..Default::default()
            })
            .unwrap();
        let hosts: Vec<_> = rows.iter().map(|r| r.hostname.as_str()).collect();
        assert_eq!(hosts, ["ae-dxb-wg-001", "gb-lon-wg-001", "us-nyc-wg-301"]);

        let owned_daita = db
            .query_relays(&QueryFilter {
                owned: Some(true),
                daita: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(owned_daita.len(), 1);
    }

    #[test]
    fn query_without_match_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let rows = db
            .query_relays(&QueryFilter {
                country: Some("atlantis".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_query_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        assert!(matches!(
            db.query_relays(&QueryFilter::default()),
            Err(StoreError::Relay(RelayError::EmptyQuery))
        ));
    }

    #[test]
    fn like_wildcards_are_literal() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let rows = db
            .query_relays(&QueryFilter {
                city: Some("%%".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(rows.is_empty());
    }
}
