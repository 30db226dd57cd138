use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::streamers::Streamer;

#[derive(Clone, PartialEq, Eq)]
pub struct SubscribeRequest {
    pub hub_url: String,
    pub callback_url: String,
    pub secret: String,
    pub topic: String,
    pub lease_seconds: i64,
    pub verify_mode: String,
}

impl std::fmt::Debug for SubscribeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscribeRequest")
            .field("hub_url", &self.hub_url)
            .field("callback_url", &self.callback_url)
            .field("secret", &"<redacted>")
            .field("topic", &self.topic)
            .field("lease_seconds", &self.lease_seconds)
            .field("verify_mode", &self.verify_mode)
            .finish()
    }
}

#[automock]
#[async_trait]
pub trait HubClient {
    async fn subscribe(&self, streamer: &Streamer, request: &SubscribeRequest) -> Result<()>;
}
