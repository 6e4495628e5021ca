//! Typed client for the switch tree backend
//!
//! One method per endpoint. Nothing here touches shared state; the stores
//! apply the returned values.

use std::sync::Arc;

use crate::error::Result;
use crate::io::HttpClient;
use crate::transport::{DeploymentContext, Transport};
use crate::types::{
    ButtonLabels, ChannelRequest, CleanupResponse, InitializationResponse, SettingsPayload,
    SwitchRequest, TreeState, Verification, VerificationRequest,
};

/// Client for the switch tree HTTP API
#[derive(Debug)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn with_http_client(
        http: Arc<dyn HttpClient>,
        context: DeploymentContext,
        origin: &str,
    ) -> Self {
        Self::new(Transport::new(http, context, origin))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Route the tree to a channel (0-based)
    pub async fn request_channel(&self, request: &ChannelRequest) -> Result<TreeState> {
        tracing::debug!("Requesting channel {}", request.number);
        self.transport.post("/channel", request).await
    }

    /// Flip a single relay
    pub async fn flip_switch(&self, request: &SwitchRequest) -> Result<TreeState> {
        tracing::debug!("Flipping switch R{}", request.number);
        self.transport.post("/switch", request).await
    }

    pub async fn get_tree_state(&self) -> Result<TreeState> {
        self.transport.get("/tree").await
    }

    /// Drive every relay back to its rest position
    pub async fn reset(&self, verification: Verification) -> Result<TreeState> {
        self.transport
            .post("/reset", &VerificationRequest { verification })
            .await
    }

    /// Re-send the current path to the hardware
    pub async fn re_assert(&self, verification: Verification) -> Result<TreeState> {
        self.transport
            .post("/re_assert", &VerificationRequest { verification })
            .await
    }

    pub async fn preemptive_amp_shutoff(&self) -> Result<TreeState> {
        self.transport.get("/preemptive_amp_shutoff").await
    }

    pub async fn get_button_labels(&self) -> Result<ButtonLabels> {
        self.transport.get("/button_labels").await
    }

    pub async fn update_button_labels(&self, labels: &ButtonLabels) -> Result<ButtonLabels> {
        self.transport.post("/button_labels", labels).await
    }

    pub async fn get_settings(&self) -> Result<SettingsPayload> {
        self.transport.get("/settings").await
    }

    pub async fn update_settings(&self, settings: &SettingsPayload) -> Result<SettingsPayload> {
        self.transport.post("/settings", settings).await
    }

    pub async fn initialize(&self) -> Result<InitializationResponse> {
        self.transport.get("/initialize").await
    }

    /// Ask the backend to release the hardware before shutdown
    pub async fn cleanup(&self) -> Result<CleanupResponse> {
        self.transport.post("/cleanup", &serde_json::json!({})).await
    }
}
