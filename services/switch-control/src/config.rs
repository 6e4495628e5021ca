//! Configuration types for the switch control client

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::transport::DeploymentContext;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Hosting context, resolved once at startup
    #[serde(default)]
    pub deployment: DeploymentContext,
    /// Page origin used when the deployment context resolves to a relative base
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deployment: DeploymentContext::default(),
            origin: default_origin(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:8854".to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SwitchControlError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
