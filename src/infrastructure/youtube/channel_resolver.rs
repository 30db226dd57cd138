use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::repositories::channel_resolver::ChannelResolver;

pub const YOUTUBE_DATA_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves `@handle`s through the YouTube Data API `channels?forHandle=` lookup.
pub struct YouTubeChannelResolver {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
}

impl YouTubeChannelResolver {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(RESOLVE_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: YOUTUBE_DATA_API_BASE.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl ChannelResolver for YouTubeChannelResolver {
    async fn resolve_channel_id(&self, handle: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("YOUTUBE_API_KEY is not configured");
        };

        let handle = format!("@{}", handle.trim().trim_start_matches('@'));
        let url = format!("{}/channels", self.api_base.trim_end_matches('/'));

        debug!(handle = %handle, "channel_resolver: resolving handle");

        let response = self
            .client
            .get(&url)
            .query(&[("part", "id"), ("forHandle", handle.as_str()), ("key", api_key)])
            .send()
            .await
            .map_err(|err| anyhow!("channel lookup request failed: {}", err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            bail!("channel lookup returned status {}", status);
        }

        let body: ChannelListResponse = response
            .json()
            .await
            .map_err(|err| anyhow!("channel lookup response was not understood: {}", err.without_url()))?;

        first_channel_id(body).ok_or_else(|| anyhow!("no channel found for handle {}", handle))
    }
}

fn first_channel_id(body: ChannelListResponse) -> Option<String> {
    body.items
        .into_iter()
        .map(|item| item.id.trim().to_string())
        .find(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_channel_id_is_used() {
        let body: ChannelListResponse =
            serde_json::from_str(r#"{"items":[{"id":" "},{"id":"UCabc"}]}"#).unwrap();
        assert_eq!(first_channel_id(body).as_deref(), Some("UCabc"));
    }

    #[test]
    fn empty_response_has_no_channel() {
        let body: ChannelListResponse = serde_json::from_str(r#"{"kind":"youtube#channelListResponse"}"#).unwrap();
        assert_eq!(first_channel_id(body), None);
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_a_request() {
        let resolver = YouTubeChannelResolver::new(Some("  ".to_string()))
            .unwrap()
            .with_api_base("http://127.0.0.1:9");

        let err = resolver.resolve_channel_id("@noa").await.unwrap_err();
        assert!(err.to_string().contains("YOUTUBE_API_KEY"), "got: {err}");
    }
}
