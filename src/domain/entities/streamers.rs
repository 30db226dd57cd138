use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::submissions::Submission, repositories::entity_store::StoredEntity,
    value_objects::alias::normalize_alias,
};

/// An approved, catalogued streamer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streamer {
    #[serde(default)]
    pub id: String,
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub platforms: StreamerPlatforms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamerPlatforms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<YouTubeSubscription>,
}

/// Push subscription state for one YouTube channel.
///
/// Every field tolerates being absent on disk so that a partially written
/// record still loads; the lease monitor reports the gaps instead.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YouTubeSubscription {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub hub_url: String,
    #[serde(default)]
    pub verify_mode: String,
    #[serde(default)]
    pub lease_seconds: i64,
    /// RFC 3339 timestamp written when the hub verifies the subscription.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_started_at: Option<String>,
}

impl std::fmt::Debug for YouTubeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeSubscription")
            .field("channel_id", &self.channel_id)
            .field("handle", &self.handle)
            .field("secret", &"<redacted>")
            .field("topic", &self.topic)
            .field("callback_url", &self.callback_url)
            .field("hub_url", &self.hub_url)
            .field("verify_mode", &self.verify_mode)
            .field("lease_seconds", &self.lease_seconds)
            .field("lease_started_at", &self.lease_started_at)
            .finish()
    }
}

impl Streamer {
    /// Builds an unsaved streamer from an approved submission. The store assigns the id.
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            id: String::new(),
            alias: submission.alias.trim().to_string(),
            description: submission
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            languages: submission.languages.clone().unwrap_or_default(),
            platforms: StreamerPlatforms::default(),
            updated_at: None,
        }
    }
}

impl StoredEntity for Streamer {
    const COLLECTION: &'static str = "streamers";
    const KIND: &'static str = "streamer";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn set_timestamp(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    fn unique_key(&self) -> Option<String> {
        Some(normalize_alias(&self.alias)).filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_submission_copies_profile_fields() {
        let mut submission = Submission::new("  Noa Live ");
        submission.description = Some(" cozy streams ".to_string());
        submission.languages = Some(vec!["ja".to_string(), "en".to_string()]);
        submission.platform_url = Some("https://www.youtube.com/@noa".to_string());

        let streamer = Streamer::from_submission(&submission);

        assert!(streamer.id.is_empty());
        assert_eq!(streamer.alias, "Noa Live");
        assert_eq!(streamer.description, "cozy streams");
        assert_eq!(streamer.languages, vec!["ja", "en"]);
        assert!(streamer.platforms.youtube.is_none());
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let subscription = YouTubeSubscription {
            channel_id: "UC123".to_string(),
            secret: "super-secret-value".to_string(),
            ..Default::default()
        };

        let rendered = format!("{subscription:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("UC123"));
    }

    #[test]
    fn partial_records_deserialize_with_defaults() {
        let raw = r#"{"alias":"Mika","platforms":{"youtube":{"topic":"t"}}}"#;
        let streamer: Streamer = serde_json::from_str(raw).unwrap();

        let youtube = streamer.platforms.youtube.unwrap();
        assert_eq!(youtube.topic, "t");
        assert!(youtube.channel_id.is_empty());
        assert_eq!(youtube.lease_seconds, 0);
        assert!(youtube.lease_started_at.is_none());
    }
}
