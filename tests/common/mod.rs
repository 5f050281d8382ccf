//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use people_server::config::ServerConfig;
use people_server::lifecycle::{build_application, Shutdown};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Router with the people resource and admin routes installed.
pub fn app() -> Router {
    app_with(ServerConfig::default())
}

pub fn app_with(mut config: ServerConfig) -> Router {
    config.observability.metrics_enabled = false;
    build_application(config, None)
        .unwrap()
        .server
        .build_router()
        .unwrap()
}

/// Attach the peer address the server would record for a real connection.
pub fn from_client(mut request: Request<Body>, ip: &str) -> Request<Body> {
    let addr = SocketAddr::new(ip.parse().unwrap(), 40000);
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

/// Send one request through the router and return status, headers and body.
pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

pub fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

pub fn post_json(path: &str, body: &'static str) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// A server listening on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(ServerConfig::default()).await
    }

    pub async fn spawn_with(mut config: ServerConfig) -> Self {
        config.listener.bind_address = "127.0.0.1:0".into();
        config.observability.metrics_enabled = false;

        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_application(config, None).unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = app.server.run(listener, server_shutdown).await;
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
