//! Configuration store: button labels, panel title and edit mode
//!
//! Independent of the relay tree except when saving the title, which travels
//! through `/settings` together with the tree store's current device settings.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ApiClient;
use crate::error::Result;
use crate::sequence::Sequencer;
use crate::tree_store::TreeStore;
use crate::types::{ButtonLabels, InitializationResponse, SettingsPayload, DEFAULT_TITLE};

/// User-editable presentation data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub button_labels: ButtonLabels,
    pub title_label: String,
    /// Whether the operator is editing labels and title
    pub is_editing: bool,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            button_labels: ButtonLabels::default(),
            title_label: DEFAULT_TITLE.to_string(),
            is_editing: false,
        }
    }
}

pub struct ConfigStore {
    api: Arc<ApiClient>,
    tree: Arc<TreeStore>,
    state: watch::Sender<ConfigSnapshot>,
    labels_seq: Sequencer,
    title_seq: Sequencer,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl ConfigStore {
    pub fn new(api: Arc<ApiClient>, tree: Arc<TreeStore>) -> Self {
        let (state, _) = watch::channel(ConfigSnapshot::default());
        Self {
            api,
            tree,
            state,
            labels_seq: Sequencer::new(),
            title_seq: Sequencer::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConfigSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        self.state.borrow().clone()
    }

    pub fn button_labels(&self) -> ButtonLabels {
        self.state.borrow().button_labels.clone()
    }

    pub fn title(&self) -> String {
        self.state.borrow().title_label.clone()
    }

    /// Copy labels and title out of the startup snapshot
    pub fn hydrate_from_initialize(&self, resp: &InitializationResponse) {
        let labels_ticket = self.labels_seq.issue();
        let title_ticket = self.title_seq.issue();

        self.state.send_modify(|snap| {
            if let Some(labels) = &resp.button_labels {
                if self.labels_seq.admit(labels_ticket) {
                    snap.button_labels = labels.clone();
                }
            }
            if let Some(settings) = &resp.settings {
                if self.title_seq.admit(title_ticket) {
                    snap.title_label = settings
                        .title_label
                        .clone()
                        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
                }
            }
        });
        tracing::debug!("Configuration hydrated, title '{}'", self.title());
    }

    /// Local title edit; persisted by [`ConfigStore::save_title`]
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        let ticket = self.title_seq.issue();
        self.state.send_if_modified(|snap| {
            if !self.title_seq.admit(ticket) {
                return false;
            }
            snap.title_label = title;
            true
        });
    }

    pub fn set_editing(&self, editing: bool) {
        self.state.send_if_modified(|snap| {
            let changed = snap.is_editing != editing;
            snap.is_editing = editing;
            changed
        });
    }

    /// Persist labels and adopt the backend's echo
    pub async fn save_labels(&self, labels: ButtonLabels) -> Result<()> {
        let ticket = self.labels_seq.issue();
        let saved = self.api.update_button_labels(&labels).await?;

        let applied = self.state.send_if_modified(|snap| {
            if !self.labels_seq.admit(ticket) {
                return false;
            }
            snap.button_labels = saved;
            true
        });
        if applied {
            tracing::info!("Button labels saved");
        } else {
            tracing::warn!("Discarding stale button label response");
        }
        Ok(())
    }

    /// Persist the title alongside the tree store's current device settings
    pub async fn save_title(&self) -> Result<()> {
        let payload = SettingsPayload {
            settings: self.tree.settings(),
            title_label: Some(self.title()),
        };
        let ticket = self.title_seq.issue();
        let saved = self.api.update_settings(&payload).await?;

        if let Some(title) = saved.title_label {
            let applied = self.state.send_if_modified(|snap| {
                if !self.title_seq.admit(ticket) {
                    return false;
                }
                snap.title_label = title;
                true
            });
            if !applied {
                tracing::warn!("Discarding stale title response");
            }
        }
        tracing::info!("Title saved");
        Ok(())
    }

    /// Save labels and title concurrently, waiting for both to settle.
    ///
    /// Returns the first failure, labels before title.
    pub async fn save_all(&self, labels: ButtonLabels) -> Result<()> {
        let (labels_result, title_result) = tokio::join!(self.save_labels(labels), self.save_title());
        labels_result?;
        title_result
    }
}
