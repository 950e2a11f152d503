//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    /// Template root entries must be exactly `theme/file`.
    #[error("template path must be <theme>/<file>: {}", .0.display())]
    Layout(PathBuf),
    #[error("template io {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("theme not found: {0}")]
    ThemeNotFound(String),
    #[error("template: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("account id is not found: {0}")]
    UnknownTenant(String),
    #[error("render html failed: {0}")]
    Render(#[from] RenderError),
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

/// Failure returned by a page handler.
///
/// `Page` and `Db` render the theme's error template with whatever the handler
/// assigned so far (status 200). `Abort` skips rendering and is returned as is.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Page(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Abort(#[from] AppError),
}

impl HandlerError {
    pub fn page(message: impl Into<String>) -> Self {
        HandlerError::Page(message.into())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::UnknownTenant(_) => (StatusCode::BAD_REQUEST, "unknown_tenant"),
            AppError::Render(_) => (StatusCode::BAD_REQUEST, "render_error"),
            // Nothing about the expected secret goes back to the caller.
            AppError::Forbidden => return StatusCode::FORBIDDEN.into_response(),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (AppError::UnknownTenant("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Render(RenderError::ThemeNotFound("dark".into())),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::NotFound("/x".into()), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn handler_error_conversions() {
        let err: HandlerError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, HandlerError::Db(_)));
        let err: HandlerError = AppError::Forbidden.into();
        assert!(matches!(err, HandlerError::Abort(AppError::Forbidden)));
        assert_eq!(HandlerError::page("no such post").to_string(), "no such post");
    }
}
