use std::{fmt, sync::Arc};

use anyhow::anyhow;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::infrastructure::axum_http::error_responses::AppError;

/// Static bearer token guarding the admin routes. Installed on the router
/// as an `Extension`.
#[derive(Clone)]
pub struct AdminToken(Arc<str>);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::from(token.into()))
    }

    fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        expected.len() == candidate.len() && bool::from(expected.ct_eq(candidate.as_bytes()))
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(<redacted>)")
    }
}

/// Extractor proving the request carried the admin bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

#[async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let expected = parts
            .extensions
            .get::<AdminToken>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow!("admin token extension is missing")))?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        if !expected.matches(token) {
            warn!(path = %parts.uri.path(), "auth: rejected admin token");
            return Err(AppError::Unauthorized);
        }

        Ok(AdminAuth)
    }
}

#[cfg(test)]
mod tests;
