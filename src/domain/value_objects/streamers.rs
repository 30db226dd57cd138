use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::streamers::{Streamer, YouTubeSubscription};

/// Streamer as exposed to admin clients. The subscription secret is omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamerModel {
    pub id: String,
    pub alias: String,
    pub description: String,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<YouTubeSubscriptionModel>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YouTubeSubscriptionModel {
    pub channel_id: String,
    pub handle: Option<String>,
    pub topic: String,
    pub callback_url: String,
    pub hub_url: String,
    pub verify_mode: String,
    pub lease_seconds: i64,
    pub lease_started_at: Option<String>,
}

impl From<&YouTubeSubscription> for YouTubeSubscriptionModel {
    fn from(subscription: &YouTubeSubscription) -> Self {
        Self {
            channel_id: subscription.channel_id.clone(),
            handle: subscription.handle.clone(),
            topic: subscription.topic.clone(),
            callback_url: subscription.callback_url.clone(),
            hub_url: subscription.hub_url.clone(),
            verify_mode: subscription.verify_mode.clone(),
            lease_seconds: subscription.lease_seconds,
            lease_started_at: subscription.lease_started_at.clone(),
        }
    }
}

impl From<Streamer> for StreamerModel {
    fn from(streamer: Streamer) -> Self {
        Self {
            youtube: streamer
                .platforms
                .youtube
                .as_ref()
                .map(YouTubeSubscriptionModel::from),
            id: streamer.id,
            alias: streamer.alias,
            description: streamer.description,
            languages: streamer.languages,
            updated_at: streamer.updated_at,
        }
    }
}

/// Body of a re-onboarding request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeYouTubeModel {
    pub platform_url: String,
}
