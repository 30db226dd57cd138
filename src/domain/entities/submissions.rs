use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{repositories::entity_store::StoredEntity, value_objects::alias::normalize_alias};

/// A candidate streamer waiting for an admin decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

impl Submission {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            alias: alias.into(),
            description: None,
            languages: None,
            platform_url: None,
            submitted_at: None,
            submitted_by: None,
        }
    }

    /// Trimmed platform URL, if one was supplied.
    pub fn platform_url(&self) -> Option<&str> {
        self.platform_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl StoredEntity for Submission {
    const COLLECTION: &'static str = "submissions";
    const KIND: &'static str = "submission";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    fn set_timestamp(&mut self, at: DateTime<Utc>) {
        self.submitted_at = Some(at);
    }

    fn unique_key(&self) -> Option<String> {
        Some(normalize_alias(&self.alias)).filter(|key| !key.is_empty())
    }
}
