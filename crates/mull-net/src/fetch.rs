//! Download and normalise the canonical relay list.
//!
//! The endpoint returns every relay of every transport. Only WireGuard
//! relays are kept; each is mapped to a [`RelayRecord`] with its city name
//! accent-stripped and its status messages collapsed to one line.

use std::time::Duration;

use chrono::DateTime;
use mull_shared::constants::{FETCH_TIMEOUT_SECS, SUPPORTED_RELAY_TYPE};
use mull_store::RelayRecord;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::normalize::strip_accents;

#[derive(Debug, Deserialize)]
struct ApiStatusMessage {
    message: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct ApiRelay {
    hostname: String,
    country_code: String,
    country_name: String,
    city_code: String,
    city_name: String,
    fqdn: String,
    active: bool,
    owned: bool,
    provider: String,
    ipv4_addr_in: String,
    #[serde(default)]
    ipv6_addr_in: Option<String>,
    #[serde(default)]
    network_port_speed: i64,
    #[serde(default)]
    stboot: bool,
    pubkey: String,
    #[serde(default)]
    multihop_port: Option<i64>,
    #[serde(default)]
    socks_name: Option<String>,
    #[serde(default)]
    socks_port: Option<i64>,
    #[serde(default)]
    daita: bool,
    #[serde(rename = "type")]
    relay_type: String,
    #[serde(default)]
    status_messages: Vec<ApiStatusMessage>,
}

impl From<ApiRelay> for RelayRecord {
    fn from(r: ApiRelay) -> Self {
        RelayRecord {
            status_messages: status_line(&r.status_messages),
            city_name: strip_accents(&r.city_name),
            hostname: r.hostname,
            country_code: r.country_code,
            country_name: r.country_name,
            city_code: r.city_code,
            fqdn: r.fqdn,
            active: r.active,
            owned: r.owned,
            provider: r.provider,
            ipv4_addr_in: r.ipv4_addr_in,
            ipv6_addr_in: r.ipv6_addr_in,
            network_port_speed: r.network_port_speed,
            stboot: r.stboot,
            pubkey: r.pubkey,
            multihop_port: r.multihop_port,
            socks_name: r.socks_name,
            socks_port: r.socks_port,
            daita: r.daita,
            relay_type: r.relay_type,
        }
    }
}

/// `[timestamp] message` from the first status message, or empty.
fn status_line(messages: &[ApiStatusMessage]) -> String {
    let Some(first) = messages.first() else {
        return String::new();
    };
    let stamp = DateTime::parse_from_rfc3339(&first.timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| first.timestamp.clone());
    format!("[{stamp}] {}", first.message)
}

/// Parse a relay list body, keeping WireGuard relays only.
///
/// Entries of the supported type that fail to decode are logged and
/// skipped.
pub fn parse_relays(body: &str) -> Result<Vec<RelayRecord>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = raw.len();

    let relays: Vec<RelayRecord> = raw
        .into_iter()
        .filter(|v| v.get("type").and_then(|t| t.as_str()) == Some(SUPPORTED_RELAY_TYPE))
        .filter_map(|v| match serde_json::from_value::<ApiRelay>(v) {
            Ok(relay) => Some(relay.into()),
            Err(e) => {
                warn!(error = %e, "skipping malformed relay entry");
                None
            }
        })
        .collect();

    debug!(total, kept = relays.len(), "parsed relay list");
    Ok(relays)
}

/// GET the relay list from `url` and parse it.
pub async fn fetch_relays(url: &str) -> Result<Vec<RelayRecord>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    info!(%url, "fetching relay list");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_relays(&body)
}
