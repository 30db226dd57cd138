//! WebSub intent verification for the YouTube hub.
//!
//! The hub calls back with a `GET` carrying `hub.mode`, `hub.topic` and
//! `hub.challenge`. The challenge is echoed only for topics we track; a
//! non-2xx answer tells the hub to drop the subscription. Notification
//! delivery (`POST`) is not handled.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{info, warn};

use crate::{
    application::usercases::subscription_onboarding::SubscriptionOnboardingUseCase,
    domain::{
        entities::streamers::Streamer,
        repositories::{
            channel_resolver::ChannelResolver, entity_store::EntityStore, hub_client::HubClient,
        },
        value_objects::{
            hub_verifications::{HubMode, HubVerification},
            operation_context::OperationContext,
        },
    },
    infrastructure::axum_http::error_responses::AppError,
};

pub fn routes<T, H, R>(onboarding_usecase: Arc<SubscriptionOnboardingUseCase<T, H, R>>) -> Router
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    Router::new()
        .route("/youtube", get(verify_youtube))
        .with_state(onboarding_usecase)
}

pub async fn verify_youtube<T, H, R>(
    State(onboarding_usecase): State<Arc<SubscriptionOnboardingUseCase<T, H, R>>>,
    Query(verification): Query<HubVerification>,
) -> Result<impl IntoResponse, AppError>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    let ctx = OperationContext::new();

    match verification.hub_mode()? {
        HubMode::Subscribe => {
            let challenge = verification.challenge()?.to_string();
            let lease_seconds = verification.lease_seconds()?;
            let streamer = onboarding_usecase
                .confirm_lease(&ctx, &verification.topic, lease_seconds)
                .await?;
            info!(streamer_id = %streamer.id, "websub: subscription verified");
            Ok((StatusCode::OK, challenge))
        }
        HubMode::Unsubscribe => {
            let challenge = verification.challenge()?.to_string();
            let streamer = onboarding_usecase
                .find_by_topic(&ctx, &verification.topic)
                .await?;
            info!(streamer_id = %streamer.id, "websub: unsubscription verified");
            Ok((StatusCode::OK, challenge))
        }
        HubMode::Denied => {
            warn!(
                topic = %verification.topic,
                reason = ?verification.reason,
                "websub: hub denied subscription"
            );
            Ok((StatusCode::OK, String::new()))
        }
    }
}
