//! Config reload endpoint and the unmatched-path fallback.

use crate::error::{AppError, ConfigError};
use crate::response;
use crate::state::AppState;
use crate::tenant::ResolvedTenant;
use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
};

/// Header carrying the reload secret.
pub const TOKEN_HEADER: &str = "x-token";

/// ANY /api/reload: re-read the site file and echo the active config.
///
/// The token is checked before any file I/O. A reload that fails to read or
/// parse is logged and the previous config keeps serving.
pub async fn reload(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let current = state.config.snapshot();
    let presented = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok());
    match (current.reload_token(), presented) {
        (Some(expected), Some(got)) if expected == got => {}
        _ => {
            tracing::warn!("reload rejected: bad or missing token");
            return Err(AppError::Forbidden);
        }
    }

    let active = match state.config.reload().await {
        Ok(fresh) => {
            state.templates.invalidate();
            fresh
        }
        Err(_) => state.config.snapshot(),
    };
    let yaml = serde_yaml::to_string(&*active).map_err(ConfigError::from)?;
    Ok(response::html(format!(
        r#"<pre style='font-size:16px;font-family:"serif"'>{}</pre>"#,
        minijinja::HtmlEscape(&yaml)
    )))
}

/// No route matched: serve the tenant's Google site verification file, else 404.
pub async fn site_verification(tenant: ResolvedTenant, uri: Uri) -> Response {
    let wanted = tenant.tenant.google_site_verify.trim_start_matches('/');
    if !wanted.is_empty() && uri.path().trim_start_matches('/') == wanted {
        return response::text(tenant.tenant.google_site_verify_text.clone());
    }
    AppError::NotFound(uri.path().to_string()).into_response()
}
