//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single catch-all handler
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener with graceful shutdown
//! - Dispatch requests through the routing engine
//! - Hand allowed targets to the streaming forwarder

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::{ForwardError, Forwarded, Forwarder};
use crate::http::{request, response};
use crate::observability::metrics;
use crate::routing::{Route, Router as ProxyRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, ForwardError> {
        let proxy_router = Arc::new(ProxyRouter::from_config(config));
        let forwarder = Arc::new(Forwarder::new(&config.upstream)?);

        let (allow, deny, bypass) = proxy_router.access().rule_counts();
        tracing::info!(
            white_list = allow,
            black_list = deny,
            pass_list = bypass,
            jsdelivr_mirror = config.mirror.jsdelivr,
            size_limit = %config.upstream.size_limit,
            chunk_size = config.upstream.chunk_size,
            "Proxy configured"
        );

        let state = AppState {
            router: proxy_router,
            forwarder,
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request::set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(request::propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler.
/// Routes the request, then redirects, refuses, serves or forwards it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request::request_id(request.headers()).to_string();
    let method = request.method().to_string();

    let route = state
        .router
        .route(request.uri().path(), request.uri().query());
    let mut outcome = route.outcome();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        outcome,
        "Routed request"
    );

    let response = match route {
        Route::Index => response::index(),
        Route::Favicon => response::favicon(),
        Route::QueryRedirect(target) | Route::Bypass(target) | Route::Mirror(target) => {
            tracing::debug!(request_id = %request_id, target = %target, outcome, "Redirecting");
            response::redirect(&target)
        }
        Route::Forbidden(reason) => {
            tracing::debug!(request_id = %request_id, reason = reason.message(), "Request refused");
            response::forbidden(reason)
        }
        Route::Forward(target) => match state.forwarder.forward(&target, request).await {
            Ok(Forwarded::Streamed(response)) => response,
            Ok(Forwarded::Oversize { content_length }) => {
                tracing::info!(
                    request_id = %request_id,
                    target = %target,
                    content_length,
                    size_limit = state.forwarder.size_limit(),
                    "Payload over size limit, redirecting client upstream"
                );
                outcome = "oversize";
                response::redirect(&target)
            }
            Err(e) => {
                tracing::warn!(request_id = %request_id, target = %target, error = %e, "Upstream error");
                outcome = "upstream_error";
                response::server_error(&e)
            }
        },
    };

    metrics::record_request(&method, outcome, response.status().as_u16(), start_time);
    response
}
