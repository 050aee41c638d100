//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → request.rs (request ID)
//!     → routing::Router (decide the route)
//!     → response.rs (static, redirect, 403)
//!       or forward.rs (upstream round-trip)
//!     → body.rs (fixed-size chunk streaming)
//!     → Send to client
//! ```

pub mod assets;
pub mod body;
pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardError, Forwarded, Forwarder};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
