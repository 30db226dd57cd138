use crate::{
    application::usercases::{
        lease_monitor::LeaseMonitorUseCase, streamers::StreamerUseCase,
        submissions::SubmissionUseCase, subscription_onboarding::SubscriptionOnboardingUseCase,
    },
    config::config_model::DotEnvyConfig,
    domain::entities::{streamers::Streamer, submissions::Submission},
    infrastructure::{
        axum_http::{auth::AdminToken, default_routers, routers},
        json_store::file_store::JsonFileStore,
        youtube::{channel_resolver::YouTubeChannelResolver, hub_client::YouTubeHubClient},
    },
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub type SubmissionStore = JsonFileStore<Submission>;
pub type StreamerStore = JsonFileStore<Streamer>;

/// Long-lived collaborators shared by every router.
pub struct CatalogInfra {
    pub submission_store: Arc<SubmissionStore>,
    pub streamer_store: Arc<StreamerStore>,
    pub hub_client: Arc<YouTubeHubClient>,
    pub channel_resolver: Arc<YouTubeChannelResolver>,
}

pub fn app(config: &DotEnvyConfig, infra: CatalogInfra) -> Result<Router> {
    let onboarding_usecase = Arc::new(SubscriptionOnboardingUseCase::new(
        Arc::clone(&infra.streamer_store),
        Arc::clone(&infra.hub_client),
        Arc::clone(&infra.channel_resolver),
        config.subscription_options(),
    ));
    let submission_usecase = SubmissionUseCase::new(
        Arc::clone(&infra.submission_store),
        Arc::clone(&infra.streamer_store),
        Arc::clone(&onboarding_usecase),
    );
    let streamer_usecase =
        StreamerUseCase::new(Arc::clone(&infra.streamer_store), Arc::clone(&onboarding_usecase));
    let lease_monitor_usecase = LeaseMonitorUseCase::new(
        Arc::clone(&infra.streamer_store),
        config.lease_monitor_config(),
    );

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/submissions",
            routers::submissions::routes(Arc::new(submission_usecase)),
        )
        .nest(
            "/api/v1/streamers",
            routers::streamers::routes(Arc::new(streamer_usecase)),
        )
        .nest(
            "/api/v1/subscriptions",
            routers::subscriptions::routes(Arc::new(lease_monitor_usecase)),
        )
        .nest("/api/v1/websub", routers::websub::routes(onboarding_usecase))
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(Extension(AdminToken::new(config.admin.token.clone())))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>, infra: CatalogInfra) -> Result<()> {
    let app = app(&config, infra)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install terminate signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_loader::load_from;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(dir: &TempDir) -> Router {
        let config = load_from(|key| match key {
            "SERVER_PORT" => Some("8080".to_string()),
            "ADMIN_TOKEN" => Some("t0ken".to_string()),
            _ => None,
        })
        .unwrap();
        let infra = CatalogInfra {
            submission_store: Arc::new(JsonFileStore::new(dir.path().join("submissions.json"))),
            streamer_store: Arc::new(JsonFileStore::new(dir.path().join("streamers.json"))),
            hub_client: Arc::new(YouTubeHubClient::new().unwrap()),
            channel_resolver: Arc::new(YouTubeChannelResolver::new(None).unwrap()),
        };
        app(&config, infra).unwrap()
    }

    async fn status_of(router: Router, uri: &str, token: Option<&str>) -> StatusCode {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn routes_are_mounted_and_guarded() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        assert_eq!(status_of(app.clone(), "/api/v1/health-check", None).await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "/api/v1/nowhere", None).await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(app.clone(), "/api/v1/streamers", None).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(app.clone(), "/api/v1/streamers", Some("t0ken")).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app.clone(), "/api/v1/submissions", Some("t0ken")).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app, "/api/v1/subscriptions/leases", Some("t0ken")).await,
            StatusCode::OK
        );
    }
}
