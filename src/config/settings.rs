use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_AUTH_URL, DEFAULT_HOST, DEFAULT_METRICS_PATH, DEFAULT_PORT,
    DEFAULT_RESPONSE_BUDGET_MS, DEFAULT_UPSTREAM_BASE_URL, DEFAULT_WINDOW_SIZE,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    /// invariant: > 0
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// max elapsed time of fetch + merge for a successful response,
    /// also used as the upstream client timeout.
    /// invariant: > 0
    #[serde(default = "default_response_budget_ms")]
    pub response_budget_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { capacity: default_capacity(), response_budget_ms: default_response_budget_ms() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// category paths are appended to it, e.g. `<base_url>/primes`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), auth_url: default_auth_url() }
    }
}

/// Fixed identity sent to the auth endpoint.
/// `client_id` and `client_secret` are also attached to every numbers request.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CredentialsConfig {
    pub company_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub owner_name: String,
    pub owner_email: String,
    pub roll_no: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            company_name: "goMart".to_owned(),
            client_id: "sample id".to_owned(),
            client_secret: "sample secret".to_owned(),
            owner_name: "Rahul".to_owned(),
            owner_email: "rahul@abc.edu".to_owned(),
            roll_no: "1".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { path: default_metrics_path(), is_enabled: false }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_capacity() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_response_budget_ms() -> u64 {
    DEFAULT_RESPONSE_BUDGET_MS
}

fn default_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_metrics_path() -> String {
    DEFAULT_METRICS_PATH.to_string()
}
