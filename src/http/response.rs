//! Responses produced by the proxy itself.
//!
//! # Responsibilities
//! - 302 redirects (query shortcut, bypass, mirror, oversize hand-off)
//! - 403 refusals from the access lists
//! - 500 for failed upstream round-trips
//! - The embedded index page and icon

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::assets;
use crate::security::DenyReason;

/// 302 Found to `location`.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "Unusable redirect target");
            server_error(&e)
        }
    }
}

pub fn forbidden(reason: DenyReason) -> Response {
    (StatusCode::FORBIDDEN, reason.message()).into_response()
}

pub fn server_error(err: &dyn std::fmt::Display) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("server error {err}")).into_response()
}

pub fn index() -> Response {
    static_payload(assets::INDEX_CONTENT_TYPE, assets::INDEX_HTML)
}

pub fn favicon() -> Response {
    static_payload(assets::FAVICON_CONTENT_TYPE, assets::FAVICON)
}

fn static_payload(content_type: &'static str, payload: &'static [u8]) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        Body::from(payload),
    )
        .into_response()
}
