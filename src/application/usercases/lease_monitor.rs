use std::sync::Arc;
use tracing::debug;

use crate::domain::{
    entities::streamers::Streamer,
    errors::CatalogError,
    repositories::entity_store::EntityStore,
    value_objects::{
        clock::{Clock, system_clock},
        leases::{LeaseCounts, LeaseMonitorConfig, LeaseOverview, observe_lease},
        operation_context::OperationContext,
    },
};

/// Read-only view over the renewal state of every subscribed streamer.
pub struct LeaseMonitorUseCase<T>
where
    T: EntityStore<Streamer> + 'static,
{
    streamer_store: Arc<T>,
    config: LeaseMonitorConfig,
    clock: Clock,
}

impl<T> LeaseMonitorUseCase<T>
where
    T: EntityStore<Streamer> + 'static,
{
    pub fn new(streamer_store: Arc<T>, config: LeaseMonitorConfig) -> Self {
        Self {
            streamer_store,
            config,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Streamers without a YouTube descriptor are left out entirely.
    pub async fn overview(&self, ctx: &OperationContext) -> Result<LeaseOverview, CatalogError> {
        ctx.ensure_active()?;

        let streamers = self.streamer_store.list().await?;
        let now = (self.clock)();

        let mut counts = LeaseCounts::default();
        let leases: Vec<_> = streamers
            .iter()
            .filter_map(|streamer| {
                let subscription = streamer.platforms.youtube.as_ref()?;
                let observation = observe_lease(streamer, subscription, now, &self.config);
                counts.record(observation.status);
                Some(observation)
            })
            .collect();

        debug!(
            total = counts.total(),
            pending = counts.pending,
            healthy = counts.healthy,
            renewing = counts.renewing,
            expired = counts.expired,
            "lease_monitor: overview computed"
        );

        Ok(LeaseOverview {
            generated_at: Some(now),
            counts,
            leases,
        })
    }
}
