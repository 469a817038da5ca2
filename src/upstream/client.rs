//! Upstream HTTPS client.
//!
//! # Responsibilities
//! - Build the relayed request (sanitized headers, original method and path)
//! - Open a fresh connection to the fixed upstream for every exchange
//! - Bound connect + TLS + response headers with a single timeout
//!
//! # Design Decisions
//! - No pooling: a new `Client` with zero idle slots per exchange, so the
//!   connection closes as soon as the response body is finished or dropped
//! - Generic over the connector; production always wraps it in rustls with
//!   `https_only`
//! - A zero-length captured body is sent as `Empty`, never as an empty `Full`

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, Request, Response, Uri};
use http_body_util::{Either, Empty, Full};
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::{Connect, HttpConnector};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::UpstreamTarget;
use crate::http::InboundRequest;
use crate::security::forwarded_headers;
use crate::upstream::UpstreamError;

/// Request body type sent upstream.
pub type UpstreamBody = Either<Full<Bytes>, Empty<Bytes>>;

/// Connector used in production.
pub type HttpsUpstreamConnector = HttpsConnector<HttpConnector>;

/// Build the rustls connector that refuses plaintext upstreams.
pub fn https_connector() -> Result<HttpsUpstreamConnector, UpstreamError> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(true);

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_native_roots(rustls::crypto::ring::default_provider())
        .map_err(UpstreamError::TlsRoots)?
        .https_only()
        .enable_http1()
        .wrap_connector(http);

    Ok(connector)
}

/// Performs single-shot exchanges against the configured upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient<C> {
    target: UpstreamTarget,
    host_header: HeaderValue,
    connector: C,
    timeout: Duration,
}

impl UpstreamClient<HttpsUpstreamConnector> {
    /// Client for `target` over TLS.
    pub fn https(target: UpstreamTarget, timeout: Duration) -> Result<Self, UpstreamError> {
        Self::with_connector(target, https_connector()?, timeout)
    }
}

impl<C> UpstreamClient<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    /// Client for `target` using an arbitrary connector.
    pub fn with_connector(
        target: UpstreamTarget,
        connector: C,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let host_header =
            HeaderValue::from_str(target.host()).map_err(axum::http::Error::from)?;
        Ok(Self {
            target,
            host_header,
            connector,
            timeout,
        })
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    /// Relay `request` upstream and return the response once headers arrive.
    ///
    /// The body of the returned response is still unread.
    pub async fn send(&self, request: InboundRequest) -> Result<Response<Incoming>, UpstreamError> {
        let uri = Uri::builder()
            .scheme("https")
            .authority(self.target.authority().as_str())
            .path_and_query(request.path.as_str())
            .build()?;

        let body: UpstreamBody = if request.body.is_empty() {
            Either::Right(Empty::new())
        } else {
            Either::Left(Full::new(request.body))
        };

        let mut outbound = Request::builder()
            .method(request.method)
            .uri(uri)
            .body(body)?;
        *outbound.headers_mut() = forwarded_headers(&request.headers, &self.host_header);

        let client: Client<C, UpstreamBody> = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(self.connector.clone());

        match tokio::time::timeout(self.timeout, client.request(outbound)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(UpstreamError::Timeout(self.timeout)),
        }
    }
}
