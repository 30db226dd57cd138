use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    application::usercases::lease_monitor::LeaseMonitorUseCase,
    domain::{
        entities::streamers::Streamer, repositories::entity_store::EntityStore,
        value_objects::operation_context::OperationContext,
    },
    infrastructure::axum_http::{auth::AdminAuth, error_responses::AppError},
};

pub fn routes<T>(lease_monitor_usecase: Arc<LeaseMonitorUseCase<T>>) -> Router
where
    T: EntityStore<Streamer> + 'static,
{
    Router::new()
        .route("/leases", get(lease_overview))
        .with_state(lease_monitor_usecase)
}

pub async fn lease_overview<T>(
    State(lease_monitor_usecase): State<Arc<LeaseMonitorUseCase<T>>>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, AppError>
where
    T: EntityStore<Streamer> + 'static,
{
    let overview = lease_monitor_usecase
        .overview(&OperationContext::new())
        .await?;
    Ok(Json(overview))
}
