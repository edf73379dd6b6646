//! Shared helpers for integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use health_switch::config::AppConfig;
use health_switch::http::{AppState, HttpServer};
use health_switch::lifecycle::Shutdown;

/// Start an in-process server on an ephemeral port.
///
/// Returns the bound address and the shutdown handle; dropping the handle
/// without triggering leaves the task running until the test runtime stops.
pub async fn start_server() -> (SocketAddr, Shutdown) {
    let mut config = AppConfig::default();
    config.static_assets.enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::with_state(config, AppState::new());

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
