use dependency_connector::Connector;
use logger_service::config::Config;
use logger_service::db::{PgLogStore, PostgresDependency};
use logger_service::rpc::LogRpcService;
use rpc_core::RpcServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

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

    info!("Starting logger service");

    let dependency = PostgresDependency::new(
        config.database.url.clone(),
        config.database.max_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    );

    // Not serving traffic without the store
    let pool = Connector::new(config.backoff_policy()).connect(&dependency).await?;

    let store = PgLogStore::new(pool);
    store.ensure_schema().await?;
    let store = Arc::new(store);

    let listener = TcpListener::bind(&config.server.rpc_addr).await?;
    let server = RpcServer::new(Arc::new(LogRpcService::new(Arc::clone(&store))));

    server.serve_with_shutdown(listener, shutdown_signal()).await?;

    store.close().await;
    info!("Logger service stopped");

    Ok(())
}
