use anyhow::Result;
use std::sync::Arc;
use streamer_catalog::{
    config::config_loader,
    infrastructure::{
        axum_http::http_serve::{self, CatalogInfra},
        json_store::file_store::JsonFileStore,
        youtube::{channel_resolver::YouTubeChannelResolver, hub_client::YouTubeHubClient},
    },
    observability,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Streamer catalog exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("streamer-catalog")?;

    let dotenvy_env = config_loader::load()?;
    info!(stage = %dotenvy_env.stage, "ENV has been loaded");

    if dotenvy_env.youtube.callback_url.is_none() {
        warn!("YOUTUBE_CALLBACK_URL is not set, onboarding requests will be rejected");
    }

    let infra = CatalogInfra {
        submission_store: Arc::new(JsonFileStore::new(&dotenvy_env.storage.submissions_file)),
        streamer_store: Arc::new(JsonFileStore::new(&dotenvy_env.storage.streamers_file)),
        hub_client: Arc::new(YouTubeHubClient::new()?),
        channel_resolver: Arc::new(YouTubeChannelResolver::new(
            dotenvy_env.youtube.api_key.clone(),
        )?),
    };
    info!(
        submissions_file = %dotenvy_env.storage.submissions_file,
        streamers_file = %dotenvy_env.storage.streamers_file,
        "Catalog stores are ready"
    );

    http_serve::start(Arc::new(dotenvy_env), infra).await?;

    Ok(())
}
