//! Shared utilities for integration testing.
//!
//! The mock upstream speaks plaintext HTTP/1.1 over raw TCP so tests control
//! framing byte for byte. The proxy under test reaches it through a plain
//! `HttpConnector`; production always wraps the connector in TLS.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::client::legacy::connect::HttpConnector;
use tap_proxy::config::{ListenerConfig, UpstreamTarget};
use tap_proxy::net::{Listener, ListenerError};
use tap_proxy::upstream::UpstreamClient;
use tap_proxy::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A request as the upstream saw it on the wire.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line and headers, CRLF-separated, terminated by the blank line.
    pub head: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Values of header `name` (case-insensitive), in wire order.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.head
            .split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .filter(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    pub fn request_line(&self) -> &str {
        self.head.split("\r\n").next().unwrap_or_default()
    }
}

/// Handle to a running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub requests: mpsc::UnboundedReceiver<RecordedRequest>,
    connections: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Number of TCP connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read one request (head plus Content-Length body) from `socket`.
pub async fn read_request(socket: &mut TcpStream) -> std::io::Result<RecordedRequest> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut tmp).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&tmp[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut recorded = RecordedRequest {
        head,
        body: buf[head_end..].to_vec(),
    };
    let len: usize = recorded
        .header_values("content-length")
        .first()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while recorded.body.len() < len {
        let n = socket.read(&mut tmp).await?;
        if n == 0 {
            break;
        }
        recorded.body.extend_from_slice(&tmp[..n]);
    }
    Ok(recorded)
}

/// Start a mock upstream that records each request and hands the socket to `respond`.
pub async fn start_upstream<F, Fut>(respond: F) -> MockUpstream
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let connections = Arc::new(AtomicUsize::new(0));
    let respond = Arc::new(respond);

    let counter = connections.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let tx = tx.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                if let Ok(request) = read_request(&mut socket).await {
                    let _ = tx.send(request);
                    respond(socket).await;
                }
            });
        }
    });

    MockUpstream {
        addr,
        requests: rx,
        connections,
    }
}

/// Mock upstream answering every request with a fixed 200 body.
pub async fn start_fixed_upstream(body: &'static str) -> MockUpstream {
    start_upstream(move |mut socket| async move {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    })
    .await
}

/// Start the proxy on an ephemeral loopback port, relaying to `upstream`.
pub async fn start_proxy(upstream: SocketAddr) -> (SocketAddr, Shutdown) {
    let (addr, shutdown, _server) = start_proxy_with_drain(upstream, Duration::from_secs(5)).await;
    (addr, shutdown)
}

/// Like [`start_proxy`], with an explicit drain timeout and the server task handle.
pub async fn start_proxy_with_drain(
    upstream: SocketAddr,
    drain_timeout: Duration,
) -> (SocketAddr, Shutdown, JoinHandle<Result<(), ListenerError>>) {
    let target = UpstreamTarget::parse(&format!("https://127.0.0.1:{}", upstream.port())).unwrap();
    let mut connector = HttpConnector::new();
    connector.enforce_http(false);
    let client = UpstreamClient::with_connector(target, connector, Duration::from_secs(5)).unwrap();

    let server = HttpServer::with_upstream(client).with_drain_timeout(drain_timeout);
    let listener = Listener::bind(&ListenerConfig {
        port: 0,
        max_connections: 64,
    })
    .await
    .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, server_shutdown));

    (addr, shutdown, handle)
}

/// A reqwest client that never pools or goes through a system proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
