//! Public "am I connected" check.
//!
//! Asks the provider's check endpoint which exit IP the request arrived from
//! and whether that IP belongs to one of its relays.

use std::time::Duration;

use mull_shared::constants::CHECK_TIMEOUT_SECS;
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Blacklisted {
    #[serde(default)]
    pub blacklisted: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub ip: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub mullvad_exit_ip: bool,
    #[serde(default)]
    pub mullvad_exit_ip_hostname: Option<String>,
    #[serde(default)]
    pub blacklisted: Blacklisted,
    #[serde(default)]
    pub organization: Option<String>,
}

impl ConnectionCheck {
    /// Whether traffic currently leaves through a relay.
    pub fn is_connected(&self) -> bool {
        self.mullvad_exit_ip
    }

    /// Display rows in a fixed order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        vec![
            ("ip", self.ip.clone()),
            ("country", text(&self.country)),
            ("city", text(&self.city)),
            ("mullvad_exit_ip", self.mullvad_exit_ip.to_string()),
            ("mullvad_hostname", text(&self.mullvad_exit_ip_hostname)),
            ("blacklisted", self.blacklisted.blacklisted.to_string()),
            ("organization", text(&self.organization)),
        ]
    }
}

/// GET the check endpoint at `url`.
pub async fn connection_check(url: &str) -> Result<ConnectionCheck> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(CHECK_TIMEOUT_SECS))
        .build()?;

    tracing::debug!(%url, "running connection check");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(serde_json::from_str(&body)?)
}
