use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::{RngCore, rngs::OsRng};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    entities::streamers::{Streamer, YouTubeSubscription},
    errors::CatalogError,
    repositories::{
        channel_resolver::ChannelResolver,
        entity_store::EntityStore,
        hub_client::{HubClient, SubscribeRequest},
    },
    value_objects::{
        channel_url::{parse_channel_url, topic_url},
        clock::{Clock, system_clock},
        leases::MAX_LEASE_SECONDS,
        operation_context::OperationContext,
    },
};

pub const SECRET_BYTES: usize = 24;
pub const DEFAULT_VERIFY_MODE: &str = "async";

/// Hub settings applied to every onboarding. Missing values are only
/// rejected when an onboarding is attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionOptions {
    pub hub_url: Option<String>,
    pub callback_url: Option<String>,
    pub lease_seconds: i64,
    pub verify_mode: Option<String>,
}

struct ResolvedOptions {
    hub_url: String,
    callback_url: String,
    lease_seconds: i64,
    verify_mode: String,
}

impl SubscriptionOptions {
    fn resolve(&self) -> Result<ResolvedOptions, CatalogError> {
        let callback_url = non_empty(self.callback_url.as_deref()).ok_or_else(|| {
            CatalogError::Validation("subscription callback URL is not configured".to_string())
        })?;
        let hub_url = non_empty(self.hub_url.as_deref()).ok_or_else(|| {
            CatalogError::Validation("subscription hub URL is not configured".to_string())
        })?;
        if self.lease_seconds <= 0 {
            return Err(CatalogError::Validation(
                "subscription lease seconds must be positive".to_string(),
            ));
        }
        let verify_mode =
            non_empty(self.verify_mode.as_deref()).unwrap_or_else(|| DEFAULT_VERIFY_MODE.to_string());

        Ok(ResolvedOptions {
            hub_url,
            callback_url,
            lease_seconds: self.lease_seconds,
            verify_mode,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct SubscriptionOnboardingUseCase<T, H, R>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    streamer_store: Arc<T>,
    hub_client: Arc<H>,
    channel_resolver: Arc<R>,
    options: SubscriptionOptions,
    clock: Clock,
}

impl<T, H, R> SubscriptionOnboardingUseCase<T, H, R>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    pub fn new(
        streamer_store: Arc<T>,
        hub_client: Arc<H>,
        channel_resolver: Arc<R>,
        options: SubscriptionOptions,
    ) -> Self {
        Self {
            streamer_store,
            hub_client,
            channel_resolver,
            options,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Resolves the channel behind `raw_url`, stores a fresh subscription
    /// descriptor on the streamer and asks the hub to subscribe.
    ///
    /// Any earlier descriptor (secret included) is replaced.
    pub async fn from_url(
        &self,
        ctx: &OperationContext,
        streamer: &Streamer,
        raw_url: &str,
    ) -> Result<Streamer, CatalogError> {
        ctx.ensure_active()?;

        if raw_url.trim().is_empty() {
            return Err(CatalogError::Validation("platform URL is required".to_string()));
        }
        let options = self.options.resolve()?;
        let parsed = parse_channel_url(raw_url)?;

        let channel_id = match (parsed.channel_id, parsed.handle.as_deref()) {
            (Some(channel_id), _) => channel_id,
            (None, Some(handle)) => ctx
                .run(self.channel_resolver.resolve_channel_id(handle))
                .await?
                .map_err(|err| {
                    CatalogError::Upstream(format!("resolve channel for handle {handle}: {err:#}"))
                })?,
            (None, None) => {
                return Err(CatalogError::Validation(format!(
                    "platform URL has neither a channel id nor an @handle: {}",
                    raw_url.trim()
                )));
            }
        };

        let channel_id = channel_id.trim().to_string();
        if channel_id.is_empty() {
            return Err(CatalogError::Validation(
                "platform URL resolved to an empty channel id".to_string(),
            ));
        }

        let descriptor = YouTubeSubscription {
            topic: topic_url(&channel_id),
            channel_id: channel_id.clone(),
            handle: parsed.handle,
            secret: generate_secret((self.clock)()),
            callback_url: options.callback_url,
            hub_url: options.hub_url,
            verify_mode: options.verify_mode,
            lease_seconds: options.lease_seconds,
            lease_started_at: None,
        };

        ctx.ensure_active()?;
        let updated = self.attach(&streamer.id, descriptor.clone()).await?;

        let request = SubscribeRequest {
            hub_url: descriptor.hub_url,
            callback_url: descriptor.callback_url,
            secret: descriptor.secret,
            topic: descriptor.topic,
            lease_seconds: descriptor.lease_seconds,
            verify_mode: descriptor.verify_mode,
        };

        ctx.run(self.hub_client.subscribe(&updated, &request))
            .await?
            .map_err(|err| {
                CatalogError::Upstream(format!("subscribe channel {channel_id}: {err:#}"))
            })?;

        info!(
            streamer_id = %updated.id,
            channel_id = %channel_id,
            "onboarding: subscription requested"
        );

        Ok(updated)
    }

    /// Records a hub verification: the lease starts now and lasts the
    /// granted number of seconds when the hub reports one.
    pub async fn confirm_lease(
        &self,
        ctx: &OperationContext,
        topic: &str,
        lease_seconds: Option<i64>,
    ) -> Result<Streamer, CatalogError> {
        ctx.ensure_active()?;

        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return Err(CatalogError::Validation("hub topic is required".to_string()));
        }
        if let Some(granted) = lease_seconds.filter(|seconds| *seconds > MAX_LEASE_SECONDS) {
            return Err(CatalogError::Validation(format!(
                "granted lease of {granted}s exceeds {MAX_LEASE_SECONDS}s"
            )));
        }

        let now = (self.clock)();
        let target = topic.clone();
        let streamers = self
            .streamer_store
            .update_file(Box::new(move |streamers: &mut Vec<Streamer>| {
                let streamer = streamers
                    .iter_mut()
                    .find(|streamer| {
                        streamer
                            .platforms
                            .youtube
                            .as_ref()
                            .is_some_and(|youtube| youtube.topic == target)
                    })
                    .ok_or_else(|| CatalogError::not_found("subscription", target.clone()))?;

                streamer.updated_at = Some(now);
                if let Some(subscription) = streamer.platforms.youtube.as_mut() {
                    subscription.lease_started_at = Some(now.to_rfc3339());
                    if let Some(granted) = lease_seconds.filter(|seconds| *seconds > 0) {
                        subscription.lease_seconds = granted;
                    }
                }
                Ok(())
            }))
            .await?;

        let confirmed = find_by_topic(streamers, &topic)?;
        info!(
            streamer_id = %confirmed.id,
            lease_seconds = ?lease_seconds,
            "onboarding: hub verified subscription lease"
        );

        Ok(confirmed)
    }

    /// Looks up the streamer subscribed to `topic`.
    pub async fn find_by_topic(
        &self,
        ctx: &OperationContext,
        topic: &str,
    ) -> Result<Streamer, CatalogError> {
        ctx.ensure_active()?;
        let streamers = self.streamer_store.list().await?;
        find_by_topic(streamers, topic.trim())
    }

    async fn attach(
        &self,
        streamer_id: &str,
        descriptor: YouTubeSubscription,
    ) -> Result<Streamer, CatalogError> {
        let now = (self.clock)();
        let target = streamer_id.to_string();

        let streamers = self
            .streamer_store
            .update_file(Box::new(move |streamers: &mut Vec<Streamer>| {
                let streamer = streamers
                    .iter_mut()
                    .find(|streamer| streamer.id.eq_ignore_ascii_case(&target))
                    .ok_or_else(|| CatalogError::not_found("streamer", target.clone()))?;
                streamer.platforms.youtube = Some(descriptor);
                streamer.updated_at = Some(now);
                Ok(())
            }))
            .await?;

        streamers
            .into_iter()
            .find(|streamer| streamer.id.eq_ignore_ascii_case(streamer_id))
            .ok_or_else(|| CatalogError::not_found("streamer", streamer_id))
    }
}

fn find_by_topic(streamers: Vec<Streamer>, topic: &str) -> Result<Streamer, CatalogError> {
    streamers
        .into_iter()
        .find(|streamer| {
            streamer
                .platforms
                .youtube
                .as_ref()
                .is_some_and(|youtube| youtube.topic == topic)
        })
        .ok_or_else(|| CatalogError::not_found("subscription", topic))
}

/// Random 24-byte secret, URL-safe base64.
fn generate_secret(now: DateTime<Utc>) -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    let random = OsRng.try_fill_bytes(&mut bytes).map(|()| bytes);
    encode_secret(random, now)
}

/// Without a secure randomness source the secret degrades to a
/// timestamp-derived value, which is predictable. The fallback is logged.
fn encode_secret(random: Result<[u8; SECRET_BYTES], rand::Error>, now: DateTime<Utc>) -> String {
    match random {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(err) => {
            warn!(
                error = %err,
                "onboarding: secure randomness unavailable, using timestamp-derived secret"
            );
            let nanos = now
                .timestamp_nanos_opt()
                .unwrap_or_else(|| now.timestamp_micros());
            URL_SAFE_NO_PAD.encode(format!("ts-{nanos}"))
        }
    }
}
