// HTTP/JSON adapter for the authentication and mail backends

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use super::{AuthBackend, Delivered, MailBackend, Outcome};
use crate::error::GatewayError;
use crate::models::{AuthPayload, MailPayload, ResultEnvelope};

pub const AUTH_SERVICE: &str = "authentication service";
pub const MAIL_SERVICE: &str = "mail service";

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub auth_url: String,
    pub mail_url: String,
    pub timeout: Duration,
}

/// Shared, pooled HTTP client; safe for concurrent requests.
pub struct HttpBackend {
    client: Client,
    auth_url: String,
    mail_url: String,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            auth_url: config.auth_url,
            mail_url: config.mail_url,
        })
    }

    async fn post_json<T: Serialize + Sync>(&self, url: &str, payload: &T) -> Result<reqwest::Response, GatewayError> {
        self.client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!("POST {} failed: {}", url, e);
                GatewayError::from(e)
            })
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn authenticate(&self, payload: &AuthPayload) -> Outcome {
        let response = self.post_json(&self.auth_url, payload).await?;

        match response.status() {
            StatusCode::OK | StatusCode::ACCEPTED => {}
            StatusCode::UNAUTHORIZED => return Err(GatewayError::InvalidCredentials),
            other => {
                warn!("Authentication service replied {}", other);
                return Err(GatewayError::BackendUnavailable { service: AUTH_SERVICE });
            }
        }

        let body: ResultEnvelope = response.json().await?;

        // soft failure signalled in-body despite a success status
        if body.error {
            return Err(GatewayError::InvalidCredentials);
        }

        info!("Authenticated {}", payload.email);

        Ok(Delivered {
            message: "Authenticated".to_string(),
            data: body.data,
        })
    }
}

#[async_trait]
impl MailBackend for HttpBackend {
    async fn send_mail(&self, payload: &MailPayload) -> Outcome {
        let response = self.post_json(&self.mail_url, payload).await?;

        if response.status() != StatusCode::ACCEPTED {
            warn!("Mail service replied {}", response.status());
            return Err(GatewayError::BackendUnavailable { service: MAIL_SERVICE });
        }

        info!("Mail to {} accepted", payload.to_address);
        Ok(Delivered::message("Mail sent"))
    }
}
