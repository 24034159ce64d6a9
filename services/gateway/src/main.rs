// Broker Gateway - single entry point for auth, log and mail actions
// Routes each inbound request to its backend over HTTP, RPC or the message queue

use broker_gateway::config::Config;
use broker_gateway::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate().map_err(anyhow::Error::msg)?;

    init_tracing(config.telemetry.json);

    info!("Starting Broker Gateway");
    info!("Log strategy: {}", config.log_backend.strategy);

    // Exits non-zero if a required dependency never came up
    let state = server::bootstrap(&config).await?;
    let app = server::build_app(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Gateway listening on: {}", bind_addr);
    info!("   POST /        - Ping");
    info!("   POST /handle  - Dispatch auth | log | mail");
    info!("   GET  /health  - Health check");
    info!("   GET  /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
