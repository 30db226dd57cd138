use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    application::usercases::streamers::StreamerUseCase,
    domain::{
        entities::streamers::Streamer,
        repositories::{
            channel_resolver::ChannelResolver, entity_store::EntityStore, hub_client::HubClient,
        },
        value_objects::{
            operation_context::OperationContext, streamers::SubscribeYouTubeModel,
        },
    },
    infrastructure::axum_http::{auth::AdminAuth, error_responses::AppError},
};

pub fn routes<T, H, R>(streamer_usecase: Arc<StreamerUseCase<T, H, R>>) -> Router
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_streamers))
        .route("/:id/youtube", post(subscribe_youtube))
        .with_state(streamer_usecase)
}

pub async fn list_streamers<T, H, R>(
    State(streamer_usecase): State<Arc<StreamerUseCase<T, H, R>>>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, AppError>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    Ok(Json(streamer_usecase.list().await?))
}

pub async fn subscribe_youtube<T, H, R>(
    State(streamer_usecase): State<Arc<StreamerUseCase<T, H, R>>>,
    _auth: AdminAuth,
    Path(id): Path<String>,
    Json(subscribe_model): Json<SubscribeYouTubeModel>,
) -> Result<impl IntoResponse, AppError>
where
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    let ctx = OperationContext::new();
    let streamer = streamer_usecase
        .subscribe_youtube(&ctx, &id, &subscribe_model.platform_url)
        .await?;
    Ok(Json(streamer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usercases::subscription_onboarding::{
            SubscriptionOnboardingUseCase, SubscriptionOptions,
        },
        domain::{
            entities::{
                streamers::{StreamerPlatforms, YouTubeSubscription},
                submissions::Submission,
            },
            repositories::{channel_resolver::MockChannelResolver, hub_client::MockHubClient},
        },
        infrastructure::{axum_http::auth::AdminToken, json_store::file_store::JsonFileStore},
    };
    use axum::{
        Extension,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(
        dir: &TempDir,
        hub: MockHubClient,
        options: SubscriptionOptions,
    ) -> (Arc<JsonFileStore<Streamer>>, Router) {
        let streamers = Arc::new(JsonFileStore::new(dir.path().join("streamers.json")));
        let mut resolver = MockChannelResolver::new();
        resolver
            .expect_resolve_channel_id()
            .returning(|_| Ok("UCresolved".to_string()));
        let onboarding = Arc::new(SubscriptionOnboardingUseCase::new(
            Arc::clone(&streamers),
            Arc::new(hub),
            Arc::new(resolver),
            options,
        ));
        let usecase = StreamerUseCase::new(Arc::clone(&streamers), onboarding);
        let router = routes(Arc::new(usecase)).layer(Extension(AdminToken::new("t0ken")));
        (streamers, router)
    }

    fn configured() -> SubscriptionOptions {
        SubscriptionOptions {
            hub_url: Some("https://hub.example/subscribe".to_string()),
            callback_url: Some("https://catalog.example/api/v1/websub/youtube".to_string()),
            lease_seconds: 864_000,
            verify_mode: None,
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn subscribe_request(id: &str, url: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/{id}/youtube"))
            .header(header::AUTHORIZATION, "Bearer t0ken")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "platform_url": url }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn listing_never_exposes_the_secret() {
        let dir = TempDir::new().unwrap();
        let mut hub = MockHubClient::new();
        hub.expect_subscribe().never();
        let (store, router) = app(&dir, hub, configured());
        store
            .append(Streamer {
                platforms: StreamerPlatforms {
                    youtube: Some(YouTubeSubscription {
                        channel_id: "UC1".to_string(),
                        secret: "hunter2-hunter2".to_string(),
                        ..Default::default()
                    }),
                },
                ..Streamer::from_submission(&Submission::new("Noa"))
            })
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, "Bearer t0ken")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["youtube"]["channel_id"], "UC1");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn handle_url_is_resolved_and_subscribed() {
        let dir = TempDir::new().unwrap();
        let mut hub = MockHubClient::new();
        hub.expect_subscribe().times(1).returning(|_, _| Ok(()));
        let (store, router) = app(&dir, hub, configured());
        let stored = store
            .append(Streamer::from_submission(&Submission::new("Noa")))
            .await
            .unwrap();

        let (status, body) =
            send(router, subscribe_request(&stored.id, "youtube.com/@noa")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["youtube"]["channel_id"], "UCresolved");
        assert_eq!(body["youtube"]["handle"], "@noa");
    }

    #[tokio::test]
    async fn missing_callback_configuration_is_a_bad_request() {
        let dir = TempDir::new().unwrap();
        let mut hub = MockHubClient::new();
        hub.expect_subscribe().never();
        let (store, router) = app(&dir, hub, SubscriptionOptions::default());
        let stored = store
            .append(Streamer::from_submission(&Submission::new("Noa")))
            .await
            .unwrap();

        let (status, _) =
            send(router, subscribe_request(&stored.id, "https://youtube.com/channel/UC1")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
