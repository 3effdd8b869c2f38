//! Numbers source
//!
//! Fetches one category from the upstream, re-authenticating once on 401.

use http::header::AUTHORIZATION;
use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::auth::token_manager::TokenManager;
use crate::config::settings::{CredentialsConfig, UpstreamConfig};
use crate::errors::{ServiceError, ServiceResult};
use crate::observability::metrics::get_metrics;
use crate::sources::category::Category;
use crate::utils::constants::{HEADER_CLIENT_ID, HEADER_CLIENT_SECRET};

pub trait FetchNumbers {
    fn fetch_numbers(
        &self,
        category: Category,
    ) -> impl std::future::Future<Output = ServiceResult<Vec<i64>>> + Send;
}

/// Numbers endpoint body.
///
/// Entries are read as `i64`. A fractional value such as `2.5`, or an
/// integer outside the `i64` range, fails the whole batch as an
/// "invalid numbers response" instead of being passed through. Integer
/// content (negatives, zero, repeats) is never filtered.
#[derive(Debug, Deserialize)]
struct NumbersResponse {
    numbers: Vec<i64>,
}

enum Attempt {
    Numbers(Vec<i64>),
    Unauthorized,
}

#[derive(Debug, Clone)]
pub struct NumberFetcher {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    tokens: TokenManager,
}

impl NumberFetcher {
    /// `client` must carry the response budget as its timeout
    pub fn new(
        client: Client,
        upstream: &UpstreamConfig,
        credentials: &CredentialsConfig,
        tokens: TokenManager,
    ) -> Self {
        Self {
            client,
            base_url: upstream.base_url.trim_end_matches('/').to_owned(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            tokens,
        }
    }

    /// Validate the category key, then fetch it
    pub async fn fetch(&self, id: &str) -> ServiceResult<Vec<i64>> {
        let category: Category = id.parse()?;
        self.fetch_numbers(category).await
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    async fn fetch_with_reauth(&self, category: Category) -> ServiceResult<Vec<i64>> {
        match self.send(category).await? {
            Attempt::Numbers(numbers) => Ok(numbers),
            Attempt::Unauthorized => {
                info!("upstream answered 401 for '{}', refreshing token", category);
                self.tokens.invalidate().await;
                self.tokens.refresh().await?;

                match self.send(category).await? {
                    Attempt::Numbers(numbers) => Ok(numbers),
                    Attempt::Unauthorized => Err(ServiceError::UpstreamFailure(format!(
                        "upstream rejected the refreshed token for {}",
                        category.path()
                    ))),
                }
            }
        }
    }

    async fn send(&self, category: Category) -> ServiceResult<Attempt> {
        let url = format!("{}{}", self.base_url, category.path());
        let token = self.tokens.current().await;
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, token)
            .header(HEADER_CLIENT_ID, &self.client_id)
            .header(HEADER_CLIENT_SECRET, &self.client_secret)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Ok(Attempt::Unauthorized);
        }
        if !status.is_success() {
            return Err(ServiceError::UpstreamFailure(format!(
                "upstream returned {} for {}",
                status,
                category.path()
            )));
        }

        response
            .json::<NumbersResponse>()
            .await
            .map(|body| Attempt::Numbers(body.numbers))
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::from(e)
                } else {
                    ServiceError::UpstreamFailure(format!("invalid numbers response: {}", e))
                }
            })
    }
}

impl FetchNumbers for NumberFetcher {
    async fn fetch_numbers(&self, category: Category) -> ServiceResult<Vec<i64>> {
        let metrics = get_metrics().await;
        let start = Instant::now();

        let result = self.fetch_with_reauth(category).await;

        metrics
            .upstream_fetch_duration
            .with_label_values(&[category.label()])
            .observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(numbers) => info!("fetched {} numbers for '{}'", numbers.len(), category),
            Err(e) => {
                metrics
                    .upstream_failures
                    .with_label_values(&[category.label(), e.reason()])
                    .inc();
                warn!("fetching '{}' failed: {}", category, e);
            }
        }
        result
    }
}
