//! Response helpers: rendered HTML and plain text bodies.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// `text/html` body with an exact `Content-Length`.
pub fn html(body: String) -> Response {
    with_type(body, "text/html")
}

pub fn text(body: String) -> Response {
    with_type(body, "text/plain; charset=utf-8")
}

fn with_type(body: String, content_type: &'static str) -> Response {
    let len = body.len();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_LENGTH, HeaderValue::from(len)),
        ],
        body,
    )
        .into_response()
}
