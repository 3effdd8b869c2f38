use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::auth::token_manager::TokenManager;
use crate::config::settings::SettingsConfig;
use crate::helpers::time::ResponseBudget;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::server::handler::RequestHandler;
use crate::server::routes;
use crate::sources::fetch::NumberFetcher;
use crate::window::aggregator::WindowAggregator;

/// Everything a request needs, owned by one server instance
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler<NumberFetcher>>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub async fn new(settings: &SettingsConfig) -> Result<Self> {
        let budget = ResponseBudget::from_millis(settings.window.response_budget_ms);
        let client = build_client(budget.limit())?;

        let tokens = TokenManager::new(
            client.clone(),
            settings.upstream.auth_url.clone(),
            &settings.credentials,
        );
        let fetcher = NumberFetcher::new(client, &settings.upstream, &settings.credentials, tokens);
        let window = WindowAggregator::new(settings.window.capacity);

        let metrics = get_metrics().await;
        Ok(Self {
            handler: Arc::new(RequestHandler::new(fetcher, window, budget)),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        })
    }

    pub fn tokens(&self) -> &TokenManager {
        self.handler.fetcher().tokens()
    }
}

/// Upstream and auth calls share the response budget as their timeout
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}

pub fn app(state: AppState, settings: &SettingsConfig) -> Router {
    routes::router()
        .merge(state.metrics_state.router(&settings.metrics))
        .with_state(state)
}

/// Initial token fetch; the listener does not wait for it
pub fn spawn_initial_token_fetch(tokens: TokenManager) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokens.refresh().await {
            error!("initial auth token fetch failed, requests will retry on 401: {}", e);
        }
    })
}

pub async fn bind(settings: &SettingsConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))
}

/// Serve until `shutdown` resolves.
pub async fn start<S>(state: AppState, settings: &SettingsConfig, listener: TcpListener, shutdown: S) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app = app(state.clone(), settings);
    let addr: SocketAddr = listener.local_addr()?;

    spawn_initial_token_fetch(state.tokens().clone());

    let metrics = get_metrics().await;
    metrics.up.set(1);
    info!("Average Calculator service running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;
    metrics.up.set(0);

    Ok(())
}
