//! Tree state store: relay tree, channel highlight and device settings
//!
//! Every mutating call sends one request and, on success, replaces the local
//! tree wholesale with the backend's reply. Nothing is applied optimistically.
//! Subscribers observe changes through a `watch` channel of [`TreeSnapshot`].

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ApiClient;
use crate::error::Result;
use crate::sequence::{Sequencer, Ticket};
use crate::types::{
    button_colors_for, ChannelRequest, InitializationResponse, Settings, SettingsPayload,
    SwitchKey, SwitchRequest, TreeState, Verification, CHANNEL_COUNT,
};

/// Everything the tree view renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeSnapshot {
    pub st: TreeState,
    pub button_colors: [bool; CHANNEL_COUNT],
    pub settings: Settings,
    /// Set once `init` has succeeded
    pub initialized: bool,
}

/// Client-side mirror of the backend's relay tree
pub struct TreeStore {
    api: Arc<ApiClient>,
    state: watch::Sender<TreeSnapshot>,
    tree_seq: Sequencer,
    settings_seq: Sequencer,
}

impl std::fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeStore")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl TreeStore {
    /// Create a store holding the all-off default tree
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(TreeSnapshot::default());
        Self {
            api,
            state,
            tree_seq: Sequencer::new(),
            settings_seq: Sequencer::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TreeSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        self.state.borrow().clone()
    }

    pub fn tree(&self) -> TreeState {
        self.state.borrow().st.clone()
    }

    pub fn button_colors(&self) -> [bool; CHANNEL_COUNT] {
        self.state.borrow().button_colors
    }

    pub fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Fetch the aggregate startup snapshot and adopt its tree and settings.
    ///
    /// The response is returned so labels and title can be handed to the
    /// configuration store.
    pub async fn init(&self) -> Result<InitializationResponse> {
        let tree_ticket = self.tree_seq.issue();
        let settings_ticket = self.settings_seq.issue();
        let response = self.api.initialize().await?;

        self.state.send_modify(|snap| {
            if self.tree_seq.admit(tree_ticket) {
                snap.button_colors = update_buttons(&response.tree_state);
                snap.st = response.tree_state.clone();
            }
            if let Some(payload) = &response.settings {
                if self.settings_seq.admit(settings_ticket) {
                    snap.settings = payload.settings.clone();
                }
            }
            snap.initialized = true;
        });

        tracing::info!(
            "Tree initialized, activated channel {}",
            response.tree_state.activated_channel
        );
        Ok(response)
    }

    /// Re-read the tree without changing the hardware
    pub async fn refresh(&self) -> Result<()> {
        let ticket = self.tree_seq.issue();
        let tree = self.api.get_tree_state().await?;
        self.apply_tree(ticket, tree, "refresh");
        Ok(())
    }

    pub async fn reset_tree(&self, verification: Verification) -> Result<()> {
        let ticket = self.tree_seq.issue();
        let tree = self.api.reset(verification).await?;
        self.apply_tree(ticket, tree, "reset");
        Ok(())
    }

    pub async fn re_assert_tree(&self, verification: Verification) -> Result<()> {
        let ticket = self.tree_seq.issue();
        let tree = self.api.re_assert(verification).await?;
        self.apply_tree(ticket, tree, "re-assert");
        Ok(())
    }

    /// Flip the relay named by `key` ("R1".."R7")
    pub async fn toggle(&self, key: &str, verification: Verification) -> Result<()> {
        let key: SwitchKey = key.parse()?;
        self.toggle_switch(key, verification).await
    }

    pub async fn toggle_switch(&self, key: SwitchKey, verification: Verification) -> Result<()> {
        let ticket = self.tree_seq.issue();
        let request = SwitchRequest {
            number: key.number(),
            verification,
        };
        let tree = self.api.flip_switch(&request).await?;
        self.apply_tree(ticket, tree, "toggle");
        Ok(())
    }

    /// Route the tree to channel `idx` (0-based)
    pub async fn to_channel(&self, idx: i64, verification: Verification) -> Result<()> {
        let ticket = self.tree_seq.issue();
        let request = ChannelRequest {
            number: idx,
            verification,
        };
        let tree = self.api.request_channel(&request).await?;
        self.apply_tree(ticket, tree, "channel");
        Ok(())
    }

    pub async fn preemptive_amp_shutoff(&self) -> Result<()> {
        let ticket = self.tree_seq.issue();
        let tree = self.api.preemptive_amp_shutoff().await?;
        self.apply_tree(ticket, tree, "amp shutoff");
        Ok(())
    }

    /// Apply an operator edit to the local settings; nothing is sent until
    /// [`TreeStore::save_settings`].
    pub fn edit_settings(&self, edit: impl FnOnce(&mut Settings)) {
        let ticket = self.settings_seq.issue();
        self.state.send_if_modified(|snap| {
            if !self.settings_seq.admit(ticket) {
                return false;
            }
            edit(&mut snap.settings);
            true
        });
    }

    /// Push the current settings and adopt the backend's echo.
    ///
    /// Failures are logged and the local settings are kept as they were.
    pub async fn save_settings(&self) {
        let payload = SettingsPayload {
            settings: self.settings(),
            title_label: None,
        };
        let ticket = self.settings_seq.issue();

        match self.api.update_settings(&payload).await {
            Ok(saved) => {
                let applied = self.state.send_if_modified(|snap| {
                    if !self.settings_seq.admit(ticket) {
                        return false;
                    }
                    snap.settings = saved.settings;
                    true
                });
                if applied {
                    tracing::info!("Settings saved");
                } else {
                    tracing::warn!("Discarding stale settings response");
                }
            }
            Err(e) => {
                tracing::error!("Failed to save settings: {}", e);
            }
        }
    }

    /// Re-read `/settings` and report whether the backend holds the local
    /// device settings. Lets callers detect a `save_settings` that failed.
    pub async fn settings_saved(&self) -> Result<bool> {
        let stored = self.api.get_settings().await?;
        let in_sync = stored.settings == self.settings();
        if !in_sync {
            tracing::debug!("Backend settings differ from local settings");
        }
        Ok(in_sync)
    }

    fn apply_tree(&self, ticket: Ticket, tree: TreeState, operation: &str) {
        let activated = tree.activated_channel;
        let applied = self.state.send_if_modified(|snap| {
            if !self.tree_seq.admit(ticket) {
                return false;
            }
            snap.button_colors = update_buttons(&tree);
            snap.st = tree;
            true
        });

        if applied {
            tracing::info!("Applied {} response, activated channel {}", operation, activated);
        } else {
            tracing::warn!("Discarding stale {} response", operation);
        }
    }
}

fn update_buttons(tree: &TreeState) -> [bool; CHANNEL_COUNT] {
    if tree.active_channel_index().is_none() {
        tracing::warn!(
            "Activated channel {} is out of range, no channel highlighted",
            tree.activated_channel
        );
    }
    button_colors_for(tree.activated_channel)
}
