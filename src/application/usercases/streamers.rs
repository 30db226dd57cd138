use std::sync::Arc;
use tracing::info;

use crate::application::usercases::subscription_onboarding::SubscriptionOnboardingUseCase;
use crate::domain::{
    entities::streamers::Streamer,
    errors::CatalogError,
    repositories::{
        channel_resolver::ChannelResolver, entity_store::EntityStore, hub_client::HubClient,
    },
    value_objects::{operation_context::OperationContext, streamers::StreamerModel},
};

pub struct StreamerUseCase<T, H, R>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    streamer_store: Arc<T>,
    onboarding: Arc<SubscriptionOnboardingUseCase<T, H, R>>,
}

impl<T, H, R> StreamerUseCase<T, H, R>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    pub fn new(streamer_store: Arc<T>, onboarding: Arc<SubscriptionOnboardingUseCase<T, H, R>>) -> Self {
        Self {
            streamer_store,
            onboarding,
        }
    }

    pub async fn list(&self) -> Result<Vec<StreamerModel>, CatalogError> {
        let streamers = self.streamer_store.list().await?;
        Ok(streamers.into_iter().map(StreamerModel::from).collect())
    }

    /// Re-runs onboarding for an existing streamer. Unlike approval, a
    /// failure here is returned to the caller.
    pub async fn subscribe_youtube(
        &self,
        ctx: &OperationContext,
        streamer_id: &str,
        platform_url: &str,
    ) -> Result<StreamerModel, CatalogError> {
        let streamer_id = streamer_id.trim();
        if streamer_id.is_empty() {
            return Err(CatalogError::Validation("streamer id is required".to_string()));
        }

        let streamer = self
            .streamer_store
            .list()
            .await?
            .into_iter()
            .find(|streamer| streamer.id.eq_ignore_ascii_case(streamer_id))
            .ok_or_else(|| CatalogError::not_found("streamer", streamer_id))?;

        let updated = self.onboarding.from_url(ctx, &streamer, platform_url).await?;
        info!(streamer_id = %updated.id, "streamers: youtube subscription refreshed");

        Ok(StreamerModel::from(updated))
    }
}
