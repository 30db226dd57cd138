use serde::Deserialize;

use crate::domain::{errors::CatalogError, value_objects::leases::MAX_LEASE_SECONDS};

/// Query parameters of a WebSub intent verification (`GET` on the callback).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubVerification {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.topic")]
    pub topic: String,
    #[serde(rename = "hub.challenge", default)]
    pub challenge: Option<String>,
    #[serde(rename = "hub.lease_seconds", default)]
    pub lease_seconds: Option<String>,
    #[serde(rename = "hub.reason", default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubMode {
    Subscribe,
    Unsubscribe,
    Denied,
}

impl HubVerification {
    pub fn hub_mode(&self) -> Result<HubMode, CatalogError> {
        match self.mode.trim().to_ascii_lowercase().as_str() {
            "subscribe" => Ok(HubMode::Subscribe),
            "unsubscribe" => Ok(HubMode::Unsubscribe),
            "denied" => Ok(HubMode::Denied),
            other => Err(CatalogError::Validation(format!("unsupported hub.mode: {other}"))),
        }
    }

    pub fn challenge(&self) -> Result<&str, CatalogError> {
        self.challenge
            .as_deref()
            .filter(|challenge| !challenge.is_empty())
            .ok_or_else(|| CatalogError::Validation("hub.challenge is required".to_string()))
    }

    /// Granted lease; absent when the hub did not report one.
    pub fn lease_seconds(&self) -> Result<Option<i64>, CatalogError> {
        match self.lease_seconds.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<i64>() {
                Ok(seconds) if (1..=MAX_LEASE_SECONDS).contains(&seconds) => Ok(Some(seconds)),
                _ => Err(CatalogError::Validation(format!(
                    "hub.lease_seconds is invalid: {raw}"
                ))),
            },
        }
    }
}
