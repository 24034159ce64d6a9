// HTTP handlers for the inbound surface

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use message_bus::NatsClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::config::LogStrategy;
use crate::error::GatewayError;
use crate::metrics::METRICS;
use crate::models::{InboundEnvelope, ResultEnvelope};
use crate::normalizer::{self, Normalized};
use crate::router::ActionRouter;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ActionRouter>,
    pub log_strategy: LogStrategy,
    /// Present only when the queue strategy requires the broker
    pub broker: Option<Arc<NatsClient>>,
}

impl AppState {
    pub fn new(router: ActionRouter, log_strategy: LogStrategy) -> Self {
        Self {
            router: Arc::new(router),
            log_strategy,
            broker: None,
        }
    }

    pub fn broker_status(&self) -> BrokerStatus {
        BrokerStatus::observe(self.broker.as_ref().map(|client| client.is_connected()))
    }
}

/// Broker connectivity as reported on `/health` and `/metrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerStatus {
    NotRequired,
    Connected,
    Disconnected,
}

impl BrokerStatus {
    /// `None` when the configured log strategy never opens the broker
    pub fn observe(connected: Option<bool>) -> Self {
        match connected {
            None => BrokerStatus::NotRequired,
            Some(true) => BrokerStatus::Connected,
            Some(false) => BrokerStatus::Disconnected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerStatus::NotRequired => "not_required",
            BrokerStatus::Connected => "connected",
            BrokerStatus::Disconnected => "disconnected",
        }
    }

    pub fn health(&self) -> &'static str {
        match self {
            BrokerStatus::Disconnected => "degraded",
            BrokerStatus::NotRequired | BrokerStatus::Connected => "healthy",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub log_strategy: String,
    pub broker: &'static str,
}

// Liveness ping of the gateway itself
pub async fn broker_ping() -> Normalized {
    Normalized {
        status: StatusCode::OK,
        envelope: ResultEnvelope::success("Hit the broker endpoint", None),
    }
}

// Single dispatch endpoint
pub async fn handle_submission(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Normalized {
    let request_id = Uuid::new_v4();

    async move {
        match decode_envelope(body) {
            Ok(envelope) => state.router.dispatch(envelope).await,
            Err(err) => {
                METRICS.track_dispatch("unknown", err.kind());
                normalizer::reject(err)
            }
        }
    }
    .instrument(info_span!("dispatch", %request_id))
    .await
}

fn decode_envelope(body: Result<Bytes, BytesRejection>) -> Result<InboundEnvelope, GatewayError> {
    let body = body.map_err(|rejection| GatewayError::Validation(rejection.body_text()))?;

    serde_json::from_slice(&body)
        .map_err(|e| GatewayError::Validation(format!("invalid request body: {}", e)))
}

// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let broker = state.broker_status();

    Json(HealthResponse {
        status: broker.health(),
        service: "broker-gateway",
        version: env!("CARGO_PKG_VERSION"),
        log_strategy: state.log_strategy.to_string(),
        broker: broker.as_str(),
    })
}

// Prometheus metrics endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    METRICS.record_broker_connected(state.broker_status() == BrokerStatus::Connected);

    match METRICS.export() {
        Ok(text) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(e) => {
            error!("Failed to export metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ResultEnvelope::failure("failed to export metrics")),
            )
                .into_response()
        }
    }
}
