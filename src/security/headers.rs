//! Header copy policy between client and upstream.
//!
//! # Responsibilities
//! - Drop `Host` so the upstream sees its own authority
//! - Strip hop-by-hop headers in both directions
//!
//! # Design Decisions
//! - All other headers are copied verbatim, repeated values included
//! - Framing is re-done by the HTTP stack on each side

use axum::http::HeaderMap;

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Returns true if the header must not cross the proxy.
pub fn is_excluded(name: &str) -> bool {
    name.eq_ignore_ascii_case("host") || HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Append every forwardable header of `src` to `dst`.
pub fn copy_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for (name, value) in src.iter() {
        if is_excluded(name.as_str()) {
            continue;
        }
        dst.append(name.clone(), value.clone());
    }
}
