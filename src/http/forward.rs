//! Streaming forwarder.
//!
//! # Responsibilities
//! - Replay the inbound method, headers and body against the target URL
//! - Surface upstream redirects instead of following them
//! - Point recognized `Location` targets back at this proxy
//! - Hand oversized payloads off to the client
//! - Stream everything else in fixed-size chunks
//!
//! # Design Decisions
//! - Redirect following is disabled on the client
//! - Body is never buffered; see `body::ChunkedStream`
//! - No retries: a failed round-trip is terminal for the request

use axum::body::{Body, HttpBody};
use axum::http::{header, HeaderMap, HeaderValue, Request, Response};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::http::body::ChunkedStream;
use crate::routing::classifier;
use crate::security::headers::copy_headers;

/// Errors before any response byte reached the client.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

/// Result of a successful upstream round-trip.
#[derive(Debug)]
pub enum Forwarded {
    /// Status and headers copied, body streaming.
    Streamed(Response<Body>),
    /// Declared length above the limit; the client should fetch directly.
    Oversize { content_length: u64 },
}

/// Forwards requests to arbitrary upstream URLs.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    size_limit: u64,
    chunk_size: usize,
}

impl Forwarder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .no_proxy()
            .build()?;

        Ok(Self::with_client(
            client,
            config.size_limit.as_u64(),
            config.chunk_size,
        ))
    }

    pub fn with_client(client: reqwest::Client, size_limit: u64, chunk_size: usize) -> Self {
        Self {
            client,
            size_limit,
            chunk_size,
        }
    }

    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Send `request` to `target` and relay the response.
    pub async fn forward(
        &self,
        target: &str,
        request: Request<Body>,
    ) -> Result<Forwarded, ForwardError> {
        let url = reqwest::Url::parse(target).map_err(|source| ForwardError::InvalidUrl {
            url: target.to_string(),
            source,
        })?;

        let (parts, body) = request.into_parts();

        let mut headers = HeaderMap::new();
        copy_headers(&mut headers, &parts.headers);

        let mut outbound = self.client.request(parts.method, url).headers(headers);
        if !body.is_end_stream() {
            outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = outbound.send().await?;
        let status = upstream.status();

        tracing::debug!(
            target_url = %target,
            status = %status,
            content_length = ?upstream.content_length(),
            "Upstream responded"
        );

        if let Some(length) = upstream.content_length() {
            if length > self.size_limit {
                return Ok(Forwarded::Oversize {
                    content_length: length,
                });
            }
        }

        let mut headers = HeaderMap::new();
        copy_headers(&mut headers, upstream.headers());
        rewrite_location(&mut headers);

        let stream = ChunkedStream::new(Box::pin(upstream.bytes_stream()), self.chunk_size);
        let mut response = Response::new(Body::from_stream(stream));
        *response.status_mut() = status;
        *response.headers_mut() = headers;

        Ok(Forwarded::Streamed(response))
    }
}

/// Prefix a recognized `Location` with `/` so the redirect comes back here.
///
/// Returns true if the header was rewritten.
pub fn rewrite_location(headers: &mut HeaderMap) -> bool {
    let rewritten = headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .filter(|location| classifier::classify(location).is_some())
        .and_then(|location| HeaderValue::from_str(&format!("/{location}")).ok());

    match rewritten {
        Some(value) => {
            tracing::debug!(location = ?value, "Rewrote upstream redirect");
            headers.insert(header::LOCATION, value);
            true
        }
        None => false,
    }
}
