//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{AppendHeaders, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use edge_adapter::edge::{EdgeBody, EdgeEvent, EdgeRequest};
use edge_adapter::{AdapterConfig, HttpServer, Shutdown};

/// Start a mock application that echoes what it received as JSON.
///
/// `GET /fail` answers 503; `GET /slow` answers after three seconds.
pub async fn start_mock_app() -> SocketAddr {
    let app = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        )
        .route(
            "/fail",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let payload = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "host": header("host"),
        "request_id": header("x-request-id"),
        "body": String::from_utf8_lossy(&body),
    });

    (
        AppendHeaders([
            ("set-cookie", "session=abc"),
            ("set-cookie", "theme=dark"),
            ("x-app", "mock"),
        ]),
        Json(payload),
    )
}

/// A running invoke server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<AdapterConfig>,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start an invoke server on an ephemeral port.
pub async fn start_server(config: AdapterConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, updates_rx, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        config_updates,
        handle,
    }
}

/// Config pointing the application at `app`.
pub fn config_for(app: SocketAddr) -> AdapterConfig {
    let mut config = AdapterConfig::default();
    config.server.app_url = format!("http://{}", app);
    config.server.request_timeout_secs = 5;
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Viewer request with a `Host` header.
pub fn request(method: &str, uri: &str, querystring: &str) -> EdgeRequest {
    let mut request = EdgeRequest::new(method, uri);
    request.querystring = querystring.to_string();
    request.headers.append("Host", "shop.example.com");
    request
}

pub fn event(method: &str, uri: &str, querystring: &str) -> EdgeEvent {
    EdgeEvent::from_request(request(method, uri, querystring))
}

pub fn event_with_body(method: &str, uri: &str, body: EdgeBody) -> EdgeEvent {
    let mut request = request(method, uri, "");
    request.body = Some(body);
    EdgeEvent::from_request(request)
}

/// A viewer-request event as the edge platform delivers it.
pub fn raw_event(uri: &str, querystring: &str) -> Value {
    json!({
        "Records": [{
            "cf": {
                "config": {
                    "distributionDomainName": "d111111abcdef8.cloudfront.net",
                    "distributionId": "EDFDVBD6EXAMPLE",
                    "eventType": "viewer-request",
                    "requestId": "4TyzHTaYWb1GX1qTfsHhEqV6HUDd_BzoBZnwfnvQc_1oF26ClkoUSEQ=="
                },
                "request": {
                    "clientIp": "203.0.113.178",
                    "headers": {
                        "host": [{ "key": "Host", "value": "shop.example.com" }],
                        "user-agent": [{ "key": "User-Agent", "value": "curl/8.4.0" }],
                        "accept": [{ "key": "accept", "value": "*/*" }]
                    },
                    "method": "GET",
                    "querystring": querystring,
                    "uri": uri
                }
            }
        }]
    })
}
