use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait ChannelResolver {
    /// Resolves an `@handle` to the platform's channel id.
    async fn resolve_channel_id(&self, handle: &str) -> Result<String>;
}
