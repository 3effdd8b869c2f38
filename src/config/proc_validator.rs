//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * window capacity and response budget
//!   * upstream / auth URLs
//!   * credentials presence
//!   * metrics path and its collision with service routes
//!   * logging level

use reqwest::Url;
use tracing::{error, info};

use crate::config::settings::{
    CredentialsConfig, LoggingConfig, MetricsConfig, ServiceConfig, UpstreamConfig, WindowConfig,
};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const RESERVED_PATHS: [&str; 2] = ["/", "/numbers"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    let settings = &cfg.settings;

    validate_window(&settings.window, &mut errors);
    validate_upstream(&settings.upstream, &mut errors);
    validate_credentials(&settings.credentials, &mut errors);
    validate_metrics(&settings.metrics, &mut errors);
    if let Some(logging) = &settings.logging {
        validate_logging(logging, &mut errors);
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config: {}", e);
        }
        Err(errors)
    }
}

fn validate_window(window: &WindowConfig, errors: &mut Vec<String>) {
    if window.capacity == 0 {
        errors.push("settings.window.capacity must be > 0".to_string());
    }
    if window.response_budget_ms == 0 {
        errors.push("settings.window.response_budget_ms must be > 0".to_string());
    }
}

fn validate_upstream(upstream: &UpstreamConfig, errors: &mut Vec<String>) {
    validate_http_url("settings.upstream.base_url", &upstream.base_url, errors);
    validate_http_url("settings.upstream.auth_url", &upstream.auth_url, errors);
}

fn validate_http_url(field: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "{} must use http or https, got scheme '{}'",
            field,
            url.scheme()
        )),
        Err(e) => errors.push(format!("{} '{}' is not a valid URL: {}", field, value, e)),
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    let fields = [
        ("company_name", &credentials.company_name),
        ("client_id", &credentials.client_id),
        ("client_secret", &credentials.client_secret),
        ("owner_name", &credentials.owner_name),
        ("owner_email", &credentials.owner_email),
        ("roll_no", &credentials.roll_no),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            errors.push(format!("settings.credentials.{} must not be empty", name));
        }
    }
}

fn validate_metrics(metrics: &MetricsConfig, errors: &mut Vec<String>) {
    if !metrics.is_enabled {
        return;
    }
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
        return;
    }
    let collides = RESERVED_PATHS.iter().any(|reserved| {
        metrics.path == *reserved
            || (*reserved != "/" && metrics.path.starts_with(&format!("{}/", reserved)))
    });
    if collides {
        errors.push(format!(
            "settings.metrics.path '{}' collides with a service route",
            metrics.path
        ));
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' must be one of {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}
