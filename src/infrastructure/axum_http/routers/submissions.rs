use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    application::usercases::submissions::SubmissionUseCase,
    domain::{
        entities::{streamers::Streamer, submissions::Submission},
        repositories::{
            channel_resolver::ChannelResolver, entity_store::EntityStore, hub_client::HubClient,
        },
        value_objects::{
            operation_context::OperationContext, submissions::InsertSubmissionModel,
        },
    },
    infrastructure::axum_http::{auth::AdminAuth, error_responses::AppError},
};

pub fn routes<S, T, H, R>(submission_usecase: Arc<SubmissionUseCase<S, T, H, R>>) -> Router
where
    S: EntityStore<Submission> + 'static,
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_submissions).post(submit))
        .route("/:id/:action", post(process))
        .with_state(submission_usecase)
}

pub async fn list_submissions<S, T, H, R>(
    State(submission_usecase): State<Arc<SubmissionUseCase<S, T, H, R>>>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, AppError>
where
    S: EntityStore<Submission> + 'static,
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    let submissions = submission_usecase.list().await?;
    Ok(Json(submissions))
}

pub async fn submit<S, T, H, R>(
    State(submission_usecase): State<Arc<SubmissionUseCase<S, T, H, R>>>,
    _auth: AdminAuth,
    Json(insert_submission_model): Json<InsertSubmissionModel>,
) -> Result<impl IntoResponse, AppError>
where
    S: EntityStore<Submission> + 'static,
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    let submission = submission_usecase.submit(insert_submission_model).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn process<S, T, H, R>(
    State(submission_usecase): State<Arc<SubmissionUseCase<S, T, H, R>>>,
    _auth: AdminAuth,
    Path((id, action)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError>
where
    S: EntityStore<Submission> + 'static,
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    let ctx = OperationContext::new();
    let processed = submission_usecase.process(&ctx, &action, &id).await?;
    Ok(Json(processed))
}
