pub mod axum_http;
pub mod json_store;
pub mod youtube;
