// Action Router
// Selects exactly one backend adapter per inbound envelope

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::adapters::{AuthBackend, LogBackend, MailBackend};
use crate::error::GatewayError;
use crate::metrics::METRICS;
use crate::models::{Action, AuthPayload, InboundEnvelope, LogPayload, MailPayload};
use crate::normalizer::{self, Normalized};

/// A validated request, one variant per action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Auth(AuthPayload),
    Log(LogPayload),
    Mail(MailPayload),
}

impl Dispatch {
    pub fn action(&self) -> Action {
        match self {
            Dispatch::Auth(_) => Action::Auth,
            Dispatch::Log(_) => Action::Log,
            Dispatch::Mail(_) => Action::Mail,
        }
    }
}

/// Pure selection: validate the envelope and pick its payload.
pub fn route(envelope: InboundEnvelope) -> Result<Dispatch, GatewayError> {
    let action: Action = envelope.action.parse()?;

    let dispatch = match action {
        Action::Auth => envelope.auth.map(Dispatch::Auth),
        Action::Log => envelope.log.map(Dispatch::Log),
        Action::Mail => envelope.mail.map(Dispatch::Mail),
    };

    dispatch.ok_or_else(|| GatewayError::Validation(format!("missing {} payload", action)))
}

pub struct ActionRouter {
    auth: Arc<dyn AuthBackend>,
    mail: Arc<dyn MailBackend>,
    log: Arc<dyn LogBackend>,
}

impl ActionRouter {
    pub fn new(auth: Arc<dyn AuthBackend>, mail: Arc<dyn MailBackend>, log: Arc<dyn LogBackend>) -> Self {
        Self { auth, mail, log }
    }

    /// Route, call at most one adapter, normalize.
    pub async fn dispatch(&self, envelope: InboundEnvelope) -> Normalized {
        let label = envelope
            .action
            .parse::<Action>()
            .map_or("unknown", |action| action.as_str());

        let dispatch = match route(envelope) {
            Ok(dispatch) => dispatch,
            Err(err) => {
                warn!("Rejected request: {}", err);
                METRICS.track_dispatch(label, err.kind());
                return normalizer::reject(err);
            }
        };

        let action = dispatch.action();
        let start = Instant::now();

        info!("Dispatching {} request", action);

        let outcome = match &dispatch {
            Dispatch::Auth(payload) => self.auth.authenticate(payload).await,
            Dispatch::Log(payload) => self.log.write_log(payload).await,
            Dispatch::Mail(payload) => self.mail.send_mail(payload).await,
        };

        METRICS
            .dispatch_duration_seconds
            .with_label_values(&[action.as_str()])
            .observe(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(_) => METRICS.track_dispatch(action.as_str(), "success"),
            Err(err) => {
                warn!("{} request failed: {}", action, err);
                METRICS.track_dispatch(action.as_str(), err.kind());
            }
        }

        normalizer::normalize(action, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{Delivered, MockAuthBackend, MockLogBackend, MockMailBackend};
    use axum::http::StatusCode;

    fn log_envelope() -> InboundEnvelope {
        InboundEnvelope {
            action: "log".to_string(),
            log: Some(LogPayload {
                name: "event".to_string(),
                data: "data".to_string(),
            }),
            ..Default::default()
        }
    }

    fn router(auth: MockAuthBackend, mail: MockMailBackend, log: MockLogBackend) -> ActionRouter {
        ActionRouter::new(Arc::new(auth), Arc::new(mail), Arc::new(log))
    }

    #[test]
    fn test_route_selects_payload() {
        let dispatch = route(log_envelope()).unwrap();
        assert_eq!(dispatch.action(), Action::Log);
    }

    #[test]
    fn test_route_requires_matching_payload() {
        let envelope = InboundEnvelope {
            action: "auth".to_string(),
            log: log_envelope().log,
            ..Default::default()
        };

        assert_eq!(
            route(envelope).unwrap_err(),
            GatewayError::Validation("missing auth payload".to_string())
        );
    }

    #[test]
    fn test_route_rejects_empty_action() {
        let envelope = InboundEnvelope::default();
        assert_eq!(
            route(envelope).unwrap_err(),
            GatewayError::Validation("action is required".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_action_invokes_no_adapter() {
        let mut auth = MockAuthBackend::new();
        let mut mail = MockMailBackend::new();
        let mut log = MockLogBackend::new();
        auth.expect_authenticate().times(0);
        mail.expect_send_mail().times(0);
        log.expect_write_log().times(0);

        let router = router(auth, mail, log);

        for action in ["delete", "AUTH", "", "logs"] {
            let mut envelope = log_envelope();
            envelope.action = action.to_string();

            let normalized = router.dispatch(envelope).await;

            assert_eq!(normalized.status, StatusCode::BAD_REQUEST);
            assert!(normalized.envelope.error);
        }
    }

    #[tokio::test]
    async fn test_missing_payload_counted_under_its_action() {
        let rejected = || METRICS.dispatch_total.with_label_values(&["mail", "validation_error"]).get();
        let before = rejected();

        let envelope = InboundEnvelope {
            action: "mail".to_string(),
            ..Default::default()
        };
        let normalized = router(MockAuthBackend::new(), MockMailBackend::new(), MockLogBackend::new())
            .dispatch(envelope)
            .await;

        assert_eq!(normalized.status, StatusCode::BAD_REQUEST);
        assert!(rejected() >= before + 1.0);
    }

    #[tokio::test]
    async fn test_log_invokes_only_log_adapter() {
        let auth = MockAuthBackend::new();
        let mail = MockMailBackend::new();
        let mut log = MockLogBackend::new();
        log.expect_write_log()
            .withf(|payload| payload.name == "event")
            .times(1)
            .returning(|payload| Ok(Delivered::message(format!("Processed payload via RPC: {}", payload.name))));

        let normalized = router(auth, mail, log).dispatch(log_envelope()).await;

        assert_eq!(normalized.status, StatusCode::ACCEPTED);
        assert_eq!(normalized.envelope.message, "Processed payload via RPC: event");
    }

    #[tokio::test]
    async fn test_auth_rejection_maps_to_401() {
        let mut auth = MockAuthBackend::new();
        auth.expect_authenticate()
            .times(1)
            .returning(|_| Err(GatewayError::InvalidCredentials));

        let envelope = InboundEnvelope {
            action: "auth".to_string(),
            auth: Some(AuthPayload {
                email: "u@x.com".to_string(),
                password: "wrong".to_string(),
            }),
            ..Default::default()
        };

        let normalized = router(auth, MockMailBackend::new(), MockLogBackend::new())
            .dispatch(envelope)
            .await;

        assert_eq!(normalized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(normalized.envelope.message, "invalid credentials");
    }

    #[tokio::test]
    async fn test_same_log_twice_calls_backend_twice() {
        let mut log = MockLogBackend::new();
        log.expect_write_log()
            .times(2)
            .returning(|_| Ok(Delivered::message("Logged")));

        let router = router(MockAuthBackend::new(), MockMailBackend::new(), log);

        router.dispatch(log_envelope()).await;
        router.dispatch(log_envelope()).await;
    }
}
