// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use httpmock::MockServer;
use reqwest::Client;

use crate::config::settings::SettingsConfig;
use crate::server::server::{app, AppState};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Default settings pointed at a mock upstream serving both `/auth` and the number paths
pub fn settings_for(upstream: &MockServer) -> SettingsConfig {
    let mut settings = SettingsConfig::default();
    settings.upstream.base_url = upstream.base_url();
    settings.upstream.auth_url = upstream.url("/auth");
    settings
}

/// Build the service state and serve it; the initial token fetch is not spawned
pub async fn spawn_service(settings: &SettingsConfig) -> (JoinHandle<()>, SocketAddr, AppState) {
    let state = AppState::new(settings).await.expect("app state");
    let (handle, addr) = spawn_axum(app(state.clone(), settings)).await;
    (handle, addr, state)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
