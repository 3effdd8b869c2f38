use std::{fs, path::Path};
use crate::config::proc_validator;
use crate::config::settings::{LoggingConfig, ServiceConfig};
use crate::observability::metrics::get_metrics;
use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
            metrics.config_errors.inc();
        })?;

    finalize(service_config).await
}

/// Built-in configuration, used when no config file is present
pub async fn default_config() -> Result<ServiceConfig> {
    finalize(ServiceConfig::default()).await
}

async fn finalize(mut service_config: ServiceConfig) -> Result<ServiceConfig> {
    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validation config ...");
    let metrics = get_metrics().await;
    proc_validator::validate_service_config(&service_config).map_err(|errors| {
        metrics.config_errors.inc_by(errors.len() as u64);
        anyhow!("config is not valid: {}", errors.join("; "))
    })?;

    Ok(service_config)
}

/// Replaces `${VAR}` and `${VAR:default}` with environment values
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
