//! Probes and build info. Answered for any host; no account header needed.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenants: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<Probe> {
    Json(Probe {
        status: "ok",
        tenants: None,
        database: None,
    })
}

/// Ready once the site file is loaded. A configured database must also answer,
/// otherwise 503; a site without one is ready on config alone.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    let tenants = state.config.snapshot().domains.len();
    let database = match &state.db {
        None => None,
        Some(db) => match db.ping().await {
            Ok(()) => Some("ok"),
            Err(e) => {
                tracing::warn!(error = %e, "readiness: database ping failed");
                Some("unavailable")
            }
        },
    };
    let status = if database == Some("unavailable") {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    let probe = Probe {
        status: if status.is_success() { "ok" } else { "degraded" },
        tenants: Some(tenants),
        database,
    };
    (status, Json(probe))
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

async fn version() -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn common_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
}
