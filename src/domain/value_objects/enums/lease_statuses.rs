use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    /// Not enough data on the record to compute a lease window.
    Pending,
    Healthy,
    Renewing,
    Expired,
}

impl Display for LeaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            LeaseStatus::Pending => "pending",
            LeaseStatus::Healthy => "healthy",
            LeaseStatus::Renewing => "renewing",
            LeaseStatus::Expired => "expired",
        };
        write!(f, "{}", status)
    }
}
