use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::{
    entities::streamers::Streamer,
    repositories::hub_client::{HubClient, SubscribeRequest},
};

const HUB_TIMEOUT: Duration = Duration::from_secs(10);

/// WebSub subscriber speaking to the YouTube push hub.
pub struct YouTubeHubClient {
    client: Client,
}

impl YouTubeHubClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(HUB_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HubClient for YouTubeHubClient {
    async fn subscribe(&self, streamer: &Streamer, request: &SubscribeRequest) -> Result<()> {
        let lease_seconds = request.lease_seconds.to_string();
        let form = subscribe_form(request, &lease_seconds);

        debug!(
            streamer_id = %streamer.id,
            hub_url = %request.hub_url,
            topic = %request.topic,
            "hub_client: sending subscribe request"
        );

        let response = self
            .client
            .post(&request.hub_url)
            .form(&form)
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            info!(
                streamer_id = %streamer.id,
                status = status.as_u16(),
                "hub_client: subscribe accepted"
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(anyhow!(
            "hub returned non-success status {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        ))
    }
}

fn subscribe_form<'a>(request: &'a SubscribeRequest, lease_seconds: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("hub.mode", "subscribe"),
        ("hub.callback", request.callback_url.as_str()),
        ("hub.topic", request.topic.as_str()),
        ("hub.verify", request.verify_mode.as_str()),
        ("hub.secret", request.secret.as_str()),
        ("hub.lease_seconds", lease_seconds),
    ]
}

fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("hub request timed out");
    }
    if error.is_connect() {
        return anyhow!("hub connection failed");
    }
    anyhow!("hub request failed")
}
