// Response Normalizer
// Collapses every adapter outcome into (HTTP status, ResultEnvelope)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::Outcome;
use crate::error::GatewayError;
use crate::models::{Action, ResultEnvelope};

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub status: StatusCode,
    pub envelope: ResultEnvelope,
}

impl IntoResponse for Normalized {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

pub fn normalize(action: Action, outcome: Outcome) -> Normalized {
    match outcome {
        Ok(delivered) => Normalized {
            status: success_status(action),
            envelope: ResultEnvelope::success(delivered.message, delivered.data),
        },
        Err(err) => reject(err),
    }
}

pub fn reject(err: GatewayError) -> Normalized {
    Normalized {
        status: err.status(),
        envelope: ResultEnvelope::failure(err.to_string()),
    }
}

fn success_status(action: Action) -> StatusCode {
    match action {
        Action::Auth => StatusCode::OK,
        Action::Log | Action::Mail => StatusCode::ACCEPTED,
    }
}
