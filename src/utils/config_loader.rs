use std::path::Path;
use anyhow::{anyhow, Result};

use crate::config::proc_loader::{default_config, file_to_config};
use crate::config::settings::ServiceConfig;

/// Loads the YAML config, falling back to built-in defaults when the file is absent
pub async fn run(config_path: &str) -> Result<ServiceConfig> {
    let path = Path::new(config_path);
    if !path.exists() {
        return default_config().await;
    }
    file_to_config(path).await.map_err(|e| anyhow!(format!("Invalid config format: {}", e)))
}
