use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::auth::token::{AuthToken, TokenResponse, TokenStatus};
use crate::config::settings::CredentialsConfig;
use crate::errors::{ServiceError, ServiceResult};
use crate::observability::metrics::get_metrics;

static SUCCESS_MSG: &str = "success";
static ERROR_MSG: &str = "error";

/// Fixed identity payload of the auth endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    #[serde(rename = "ownerName")]
    pub owner_name: String,
    #[serde(rename = "ownerEmail")]
    pub owner_email: String,
    #[serde(rename = "rollNo")]
    pub roll_no: String,
}

impl From<&CredentialsConfig> for AuthRequest {
    fn from(credentials: &CredentialsConfig) -> Self {
        Self {
            company_name: credentials.company_name.clone(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            owner_name: credentials.owner_name.clone(),
            owner_email: credentials.owner_email.clone(),
            roll_no: credentials.roll_no.clone(),
        }
    }
}

/// Holds the bearer token used for upstream calls and refreshes it on demand.
///
/// Clones share the same token slot. Concurrent refreshes are not
/// coalesced; the last one to finish wins.
#[derive(Debug, Clone)]
pub struct TokenManager {
    client: Client,
    auth_url: String,
    payload: Arc<AuthRequest>,
    token: Arc<RwLock<AuthToken>>,
}

impl TokenManager {
    pub fn new(client: Client, auth_url: String, credentials: &CredentialsConfig) -> Self {
        Self {
            client,
            auth_url,
            payload: Arc::new(AuthRequest::from(credentials)),
            token: Arc::new(RwLock::new(AuthToken::empty())),
        }
    }

    /// Exchange the identity payload for a fresh token and store it.
    /// No retry here, the caller decides what to do on failure.
    pub async fn refresh(&self) -> ServiceResult<()> {
        let metrics = get_metrics().await;
        match self.request_token().await {
            Ok(value) => {
                *self.token.write().await = AuthToken::valid(value);
                metrics.token_refreshes.with_label_values(&[SUCCESS_MSG]).inc();
                info!("auth token refreshed");
                Ok(())
            }
            Err(e) => {
                metrics.token_refreshes.with_label_values(&[ERROR_MSG]).inc();
                error!("auth token refresh failed: {}", e);
                Err(e)
            }
        }
    }

    async fn request_token(&self) -> ServiceResult<String> {
        let response = self
            .client
            .post(&self.auth_url)
            .json(self.payload.as_ref())
            .send()
            .await
            .map_err(|e| ServiceError::AuthFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::AuthFailure(format!(
                "auth endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map(|body| body.header_value())
            .map_err(|e| ServiceError::AuthFailure(format!("invalid auth response: {}", e)))
    }

    /// Current `Authorization` header value, empty before the first refresh
    pub async fn current(&self) -> String {
        self.token.read().await.value.clone()
    }

    pub async fn status(&self) -> TokenStatus {
        self.token.read().await.status
    }

    /// Upstream rejected the held token
    pub async fn invalidate(&self) {
        let mut token = self.token.write().await;
        if token.status == TokenStatus::Valid {
            warn!("auth token rejected by upstream, marking it unknown");
        }
        token.status = TokenStatus::Unknown;
    }

    /// Replace the held token without contacting the auth endpoint
    #[cfg(test)]
    pub(crate) async fn set(&self, value: String) {
        *self.token.write().await = AuthToken::valid(value);
    }
}
