use tokio::net::TcpListener;

use health_switch::config;
use health_switch::http::HttpServer;
use health_switch::lifecycle::Shutdown;
use health_switch::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration first so the log level is known before the subscriber
    // is installed.
    let config = config::load()?;

    logging::init(&config.logging.level);

    tracing::info!(
        port = config.listener.port,
        log_level = %config.logging.level,
        static_assets = config.static_assets.enabled,
        "health-switch starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        health_url = %format!("http://{local_addr}/health"),
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
