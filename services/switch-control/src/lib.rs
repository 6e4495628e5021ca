//! Switch Control - control panel client for a cryogenic relay switch tree
//!
//! The backend owns the hardware; this crate mirrors its state. Two stores
//! hold what an operator sees:
//!
//! | Store | Holds |
//! |-------|-------|
//! | [`TreeStore`] | relay positions, activated channel, button highlights, device settings |
//! | [`ConfigStore`] | channel button labels, panel title, edit mode |
//!
//! Both are built explicitly by [`ControlPanel`] and share one [`ApiClient`].

pub mod api;
pub mod config;
pub mod config_store;
pub mod error;
pub mod io;
pub mod sequence;
pub mod transport;
pub mod tree_store;
pub mod types;

pub use api::ApiClient;
pub use config::{load_config, Config};
pub use config_store::{ConfigSnapshot, ConfigStore};
pub use error::{Result, SwitchControlError};
pub use transport::{DeploymentContext, Transport};
pub use tree_store::{TreeSnapshot, TreeStore};
pub use types::{
    ButtonLabels, InitializationResponse, Settings, SwitchKey, TreeState, Verification,
};

use std::sync::Arc;

use crate::io::{HttpClient, ReqwestHttpClient};

/// The wired-up client: API, tree store and configuration store
#[derive(Debug)]
pub struct ControlPanel {
    api: Arc<ApiClient>,
    tree: Arc<TreeStore>,
    config: ConfigStore,
}

impl ControlPanel {
    /// Build a panel talking to the backend over reqwest
    pub fn new(config: &Config) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Build a panel on a custom HTTP client
    pub fn with_http_client(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let api = Arc::new(ApiClient::with_http_client(
            http,
            config.deployment,
            &config.origin,
        ));
        let tree = Arc::new(TreeStore::new(Arc::clone(&api)));
        let config_store = ConfigStore::new(Arc::clone(&api), Arc::clone(&tree));

        Self {
            api,
            tree,
            config: config_store,
        }
    }

    /// Fetch the startup snapshot into both stores
    pub async fn init(&self) -> Result<()> {
        let response = self.tree.init().await?;
        self.config.hydrate_from_initialize(&response);
        Ok(())
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }
}
