use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::{
    entities::streamers::{Streamer, YouTubeSubscription},
    value_objects::enums::lease_statuses::LeaseStatus,
};

pub const DEFAULT_RENEW_WINDOW: f64 = 0.05;

/// Longest lease accepted from a hub: one year.
pub const MAX_LEASE_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaseMonitorConfig {
    /// Fraction of the lease, counted back from expiry, in which renewal is due.
    pub renew_window: f64,
    /// Used when a record carries no positive lease of its own.
    pub default_lease_seconds: i64,
}

impl Default for LeaseMonitorConfig {
    fn default() -> Self {
        Self {
            renew_window: DEFAULT_RENEW_WINDOW,
            default_lease_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseObservation {
    pub streamer_id: String,
    pub alias: String,
    pub channel_id: String,
    pub lease_started_at: Option<DateTime<Utc>>,
    pub lease_seconds: i64,
    pub renew_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: LeaseStatus,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaseCounts {
    pub pending: usize,
    pub healthy: usize,
    pub renewing: usize,
    pub expired: usize,
}

impl LeaseCounts {
    pub fn record(&mut self, status: LeaseStatus) {
        match status {
            LeaseStatus::Pending => self.pending += 1,
            LeaseStatus::Healthy => self.healthy += 1,
            LeaseStatus::Renewing => self.renewing += 1,
            LeaseStatus::Expired => self.expired += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.healthy + self.renewing + self.expired
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeaseOverview {
    pub generated_at: Option<DateTime<Utc>>,
    pub counts: LeaseCounts,
    pub leases: Vec<LeaseObservation>,
}

/// Portion of the lease reserved for renewal before expiry.
///
/// Falls back to a twentieth of the lease when the configured window is
/// non-positive or swallows the whole lease, and to one second after that.
pub fn renewal_margin(lease: Duration, renew_window: f64) -> Duration {
    let lease_ms = lease.num_milliseconds();
    let mut margin_ms = (lease_ms as f64 * renew_window).round() as i64;

    if margin_ms <= 0 || margin_ms >= lease_ms {
        margin_ms = lease_ms / 20;
    }
    if margin_ms <= 0 {
        margin_ms = 1_000;
    }

    Duration::milliseconds(margin_ms)
}

/// Point-in-time lease health of one subscribed streamer.
pub fn observe_lease(
    streamer: &Streamer,
    subscription: &YouTubeSubscription,
    now: DateTime<Utc>,
    config: &LeaseMonitorConfig,
) -> LeaseObservation {
    let mut issues = Vec::new();

    let channel_id = subscription.channel_id.trim().to_string();
    if channel_id.is_empty() {
        issues.push("channel_id is missing".to_string());
    }

    let lease_started_at = match subscription.lease_started_at.as_deref().map(str::trim) {
        None | Some("") => {
            issues.push("lease_started_at is missing".to_string());
            None
        }
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(err) => {
                issues.push(format!("lease_started_at is invalid ({raw:?}): {err}"));
                None
            }
        },
    };

    let lease_seconds = if subscription.lease_seconds > 0 {
        subscription.lease_seconds
    } else {
        config.default_lease_seconds
    };
    if lease_seconds <= 0 {
        issues.push("lease_seconds is missing".to_string());
    }

    let mut observation = LeaseObservation {
        streamer_id: streamer.id.clone(),
        alias: streamer.alias.clone(),
        channel_id,
        lease_started_at,
        lease_seconds: lease_seconds.max(0),
        renew_at: None,
        expires_at: None,
        status: LeaseStatus::Pending,
        issues,
    };

    let Some(started_at) = lease_started_at else {
        return observation;
    };
    if !observation.issues.is_empty() {
        return observation;
    }

    let window = Duration::try_seconds(lease_seconds).and_then(|lease| {
        let expires_at = started_at.checked_add_signed(lease)?;
        let renew_at = expires_at.checked_sub_signed(renewal_margin(lease, config.renew_window))?;
        Some((renew_at, expires_at))
    });
    let Some((renew_at, expires_at)) = window else {
        observation
            .issues
            .push(format!("lease_seconds out of range ({lease_seconds})"));
        return observation;
    };

    observation.status = if now >= expires_at {
        LeaseStatus::Expired
    } else if now >= renew_at {
        LeaseStatus::Renewing
    } else {
        LeaseStatus::Healthy
    };
    observation.renew_at = Some(renew_at);
    observation.expires_at = Some(expires_at);

    observation
}
