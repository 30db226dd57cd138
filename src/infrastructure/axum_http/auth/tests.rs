use super::*;
use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use tower::ServiceExt;

fn guarded(token: Option<&str>) -> Router {
    let router = Router::new().route("/admin", get(|_auth: AdminAuth| async { "ok" }));
    match token {
        Some(token) => router.layer(Extension(AdminToken::new(token))),
        None => router,
    }
}

async fn status_for(router: Router, authorization: Option<&str>) -> StatusCode {
    let mut request = Request::builder().uri("/admin");
    if let Some(value) = authorization {
        request = request.header(AUTHORIZATION, value);
    }
    router
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_valid_bearer_token_is_accepted() {
    let status = status_for(guarded(Some("t0ken")), Some("Bearer t0ken")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_or_malformed_header_is_unauthorized() {
    assert_eq!(status_for(guarded(Some("t0ken")), None).await, StatusCode::UNAUTHORIZED);
    assert_eq!(
        status_for(guarded(Some("t0ken")), Some("Basic t0ken")).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_wrong_token_is_unauthorized() {
    assert_eq!(
        status_for(guarded(Some("t0ken")), Some("Bearer t0ke")).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_for(guarded(Some("t0ken")), Some("Bearer t0ken-and-more")).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_missing_token_extension_is_a_server_error() {
    let status = status_for(guarded(None), Some("Bearer t0ken")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_debug_output_redacts_token() {
    assert!(!format!("{:?}", AdminToken::new("t0ken")).contains("t0ken"));
}
