//! GitHub resource proxy library.
//!
//! Clients embed a target URL in the request path
//! (`/https://github.com/{author}/{repo}/releases/...`); the proxy normalizes
//! it, applies the allow/deny/bypass lists, optionally redirects branch files
//! to jsDelivr, and otherwise streams the upstream response back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
