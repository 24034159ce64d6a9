// Gateway bootstrap and HTTP application

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use dependency_connector::Connector;
use message_bus::{NatsDependency, Publisher, PublisherConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::adapters::{HttpBackend, HttpBackendConfig, LogBackend, QueueLogAdapter, RpcLogAdapter};
use crate::config::{Config, LogStrategy};
use crate::handlers::{self, AppState};
use crate::metrics::METRICS;
use crate::router::ActionRouter;

/// Largest accepted request body (1 MiB)
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(handlers::broker_ping))
        .route("/handle", post(handlers::handle_submission))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Wire adapters according to configuration.
///
/// Under the queue strategy the broker must connect first; a
/// `ConnectError` is returned for the caller to treat as fatal.
pub async fn bootstrap(config: &Config) -> anyhow::Result<AppState> {
    let http = Arc::new(HttpBackend::new(HttpBackendConfig {
        auth_url: config.backends.auth_url.clone(),
        mail_url: config.backends.mail_url.clone(),
        timeout: Duration::from_secs(config.backends.timeout_secs),
    })?);

    let strategy = config.log_backend.strategy;
    let (log, broker) = match strategy {
        LogStrategy::Rpc => {
            info!("Log action routed via RPC to {}", config.rpc.log_addr);
            let adapter: Arc<dyn LogBackend> = Arc::new(RpcLogAdapter::new(
                config.rpc.log_addr.clone(),
                Duration::from_secs(config.rpc.timeout_secs),
            ));
            (adapter, None)
        }
        LogStrategy::Queue => {
            info!("Log action routed via message queue at {}", config.nats.url);
            let dependency = NatsDependency::new(message_bus::NatsConfig {
                url: config.nats.url.clone(),
                stream: config.nats.stream.clone(),
                connect_timeout: Duration::from_secs(config.nats.connect_timeout_secs),
                ..Default::default()
            });

            let connector = Connector::new(config.backoff_policy());
            let connected = connector.connect(&dependency).await;
            METRICS.broker_connect_attempts.set(i64::from(connector.attempts()));

            let client = Arc::new(connected?);
            METRICS.record_broker_connected(client.is_connected());

            let publisher = Publisher::new(
                Arc::clone(&client),
                PublisherConfig {
                    publish_timeout: Duration::from_secs(config.nats.publish_timeout_secs),
                },
            );
            let adapter: Arc<dyn LogBackend> = Arc::new(QueueLogAdapter::new(Arc::new(publisher)));
            (adapter, Some(client))
        }
    };

    let router = ActionRouter::new(http.clone(), http, log);

    Ok(AppState {
        router: Arc::new(router),
        log_strategy: strategy,
        broker,
    })
}
