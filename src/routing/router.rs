//! Per-request dispatch.
//!
//! # Responsibilities
//! - Serve the two static paths and the `/?q=` shortcut
//! - Normalize the embedded target URL
//! - Classify it and apply access control
//! - Pick bypass, mirror or forward for allowed targets
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure: no I/O, the HTTP layer turns a `Route` into a response

use std::borrow::Cow;

use crate::config::ProxyConfig;
use crate::routing::{classifier, mirror, normalize};
use crate::security::{AccessControl, Decision, DenyReason};

/// What to do with one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /` with no `q`.
    Index,
    /// `/favicon.ico`.
    Favicon,
    /// `/?q=...` → 302 to `/` + q.
    QueryRedirect(String),
    /// 403 from the allow or deny list.
    Forbidden(DenyReason),
    /// 302 straight to the target.
    Bypass(String),
    /// 302 to the jsDelivr shorthand form.
    Mirror(String),
    /// Stream the target through the proxy.
    Forward(String),
}

impl Route {
    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Route::Index | Route::Favicon => "static",
            Route::QueryRedirect(_) => "query_redirect",
            Route::Forbidden(_) => "forbidden",
            Route::Bypass(_) => "bypass",
            Route::Mirror(_) => "mirror",
            Route::Forward(_) => "forwarded",
        }
    }
}

/// Request router built once from configuration.
#[derive(Debug, Clone)]
pub struct Router {
    access: AccessControl,
    mirror_enabled: bool,
}

impl Router {
    pub fn new(access: AccessControl, mirror_enabled: bool) -> Self {
        Self {
            access,
            mirror_enabled,
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(
            AccessControl::from_config(&config.rules),
            config.mirror.jsdelivr,
        )
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Decide the route for a request path and raw query string.
    ///
    /// `path` is percent-decoded first, so `https:%2F%2F` reads as `https://`.
    pub fn route(&self, path: &str, query: Option<&str>) -> Route {
        let path = match urlencoding::decode(path) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(path, error = %e, "Path is not valid UTF-8 once decoded");
                Cow::Borrowed(path)
            }
        };
        let path: &str = &path;

        if path == "/favicon.ico" {
            return Route::Favicon;
        }

        if path == "/" {
            return match query.and_then(query_target) {
                Some(q) => Route::QueryRedirect(format!("/{q}")),
                None => Route::Index,
            };
        }

        let tail = path.strip_prefix('/').unwrap_or(path);
        let url = normalize::normalize(tail);
        tracing::debug!(origin = %tail, url = %url, "Preprocessed url");

        if let Some(classified) = classifier::classify(&url) {
            tracing::debug!(
                kind = classified.kind.as_str(),
                identity = ?classified.identity,
                "Found repo in url"
            );
            match self.access.authorize(Some(classified.identity.as_slice())) {
                Decision::Deny(reason) => return Route::Forbidden(reason),
                Decision::Bypass => return Route::Bypass(bypass_target(&url, query)),
                Decision::Allow => {}
            }
        }

        if self.mirror_enabled {
            if let Some(mirror_url) = mirror::rewrite_to_mirror(&url) {
                return Route::Mirror(mirror_url);
            }
        }

        Route::Forward(normalize::with_query(&url, query))
    }
}

/// Non-empty value of the `q` query parameter.
fn query_target(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn bypass_target(url: &str, query: Option<&str>) -> String {
    let target = normalize::with_query(url, query);
    match target.strip_prefix("https:/") {
        Some(rest) if !rest.starts_with('/') => format!("https://{rest}"),
        _ => target,
    }
}
