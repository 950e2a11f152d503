//! Extract the tenant from the request (`x-account-id` header).

use crate::error::AppError;
use crate::state::AppState;
use crate::tenant::{resolve_tenant, ResolvedTenant};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// Header carrying the tenant id.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Raw tenant id from the `x-account-id` header, trimmed; `None` when absent or blank.
pub fn account_id_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ACCOUNT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for ResolvedTenant {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let resolved = resolve_tenant(state.config.snapshot(), account_id_header(&parts.headers));
        if let Err(e) = &resolved {
            tracing::debug!(path = %parts.uri.path(), error = %e, "tenant not resolved");
        }
        resolved
    }
}
