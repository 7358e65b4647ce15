//! Integration test support for Newsstand.
//!
//! Tests here are self-contained: each one spawns a stub upstream on an
//! ephemeral port, points a real gateway router at it, and drives the
//! gateway over HTTP with `reqwest`. Nothing external is required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p newsstand-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::Router;
use newsstand_gateway::config::GatewayConfig;
use newsstand_gateway::{AppState, routes};

/// A base URL nothing listens on; requests fail at the transport layer.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";

/// Serve a router on an ephemeral local port and return its address.
///
/// The server runs on a background task for the rest of the test
/// process; tests never shut it down explicitly.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    addr
}

/// Spawn the full gateway (routes plus middleware) against an upstream.
///
/// Returns the gateway's base URL.
pub async fn spawn_gateway(upstream_base: &str, demo_mode: bool) -> String {
    let config = GatewayConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        upstream_url: upstream_base.parse().expect("Invalid upstream URL"),
        demo_mode,
        sentry_dsn: None,
    };

    let state = AppState::new(config).expect("Failed to build gateway state");
    let addr = serve(routes::app(state)).await;
    format!("http://{addr}")
}

/// Spawn a stub upstream and a gateway pointed at it in one step.
///
/// Returns the gateway's base URL.
pub async fn spawn_gateway_with_stub(stub: Router, demo_mode: bool) -> String {
    let upstream = serve(stub).await;
    spawn_gateway(&format!("http://{upstream}"), demo_mode).await
}

/// A content item in the remote API's wire shape.
#[must_use]
pub fn wire_item(id: &str, name: &str, kind: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "mid": 7,
        "name": name,
        "image": format!("https://cdn.example.com/{id}.jpg"),
        "file": format!("{id}.pdf"),
        "magzineType": "free",
        "fileType": "pdf",
        "type": kind,
        "isActive": true,
        "category": "Technology",
        "downloads": 3,
        "views": 120,
        "likes": 9,
        "reads": 44,
        "description": "Stub item.",
        "rating": 4.5,
        "reviews": ["r1"],
        "createdAt": "2024-03-01T10:00:00Z",
        "totalPages": 42
    })
}

/// A success envelope in the remote API's wire shape.
#[must_use]
pub fn wire_ok(message: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "success": true, "message": message, "data": data })
}

/// A failure envelope in the remote API's wire shape.
#[must_use]
pub fn wire_failure(message: &str) -> serde_json::Value {
    serde_json::json!({ "success": false, "message": message })
}
