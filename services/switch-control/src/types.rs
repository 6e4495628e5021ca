//! Wire types exchanged with the switch tree backend
//!
//! The relay tree has seven relays arranged as a binary tree feeding eight
//! output channels:
//!
//! ```text
//!           ___  R1 ____
//!         /              \
//!       R2                R3
//!    /      \          /      \
//!   R4       R5       R6       R7
//! ```
//!
//! All shapes here are fixed-size; relay keys and label slots are known at
//! build time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SwitchControlError;

/// Number of selectable output channels
pub const CHANNEL_COUNT: usize = 8;

/// Number of relays in the tree
pub const SWITCH_COUNT: usize = 7;

/// Title shown until the backend provides one
pub const DEFAULT_TITLE: &str = "Title Here";

/// Position and in-use flag of a single relay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchState {
    pub pos: bool,
    pub color: bool,
}

/// Identifier of one relay in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKey {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl SwitchKey {
    pub const ALL: [SwitchKey; SWITCH_COUNT] = [
        SwitchKey::R1,
        SwitchKey::R2,
        SwitchKey::R3,
        SwitchKey::R4,
        SwitchKey::R5,
        SwitchKey::R6,
        SwitchKey::R7,
    ];

    /// The relay number sent to the backend (`R3` -> 3)
    pub fn number(self) -> u8 {
        match self {
            SwitchKey::R1 => 1,
            SwitchKey::R2 => 2,
            SwitchKey::R3 => 3,
            SwitchKey::R4 => 4,
            SwitchKey::R5 => 5,
            SwitchKey::R6 => 6,
            SwitchKey::R7 => 7,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(usize::from(i)).copied())
    }
}

impl fmt::Display for SwitchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.number())
    }
}

impl FromStr for SwitchKey {
    type Err = SwitchControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('R')
            .and_then(|suffix| suffix.parse::<u8>().ok())
            .and_then(SwitchKey::from_number)
            .ok_or_else(|| SwitchControlError::InvalidSwitchKey(s.to_string()))
    }
}

/// Full relay tree snapshot as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeState {
    #[serde(rename = "R1")]
    pub r1: SwitchState,
    #[serde(rename = "R2")]
    pub r2: SwitchState,
    #[serde(rename = "R3")]
    pub r3: SwitchState,
    #[serde(rename = "R4")]
    pub r4: SwitchState,
    #[serde(rename = "R5")]
    pub r5: SwitchState,
    #[serde(rename = "R6")]
    pub r6: SwitchState,
    #[serde(rename = "R7")]
    pub r7: SwitchState,
    /// 0-based channel index; anything outside `0..CHANNEL_COUNT` means none
    pub activated_channel: i64,
}

impl TreeState {
    pub fn switch(&self, key: SwitchKey) -> &SwitchState {
        match key {
            SwitchKey::R1 => &self.r1,
            SwitchKey::R2 => &self.r2,
            SwitchKey::R3 => &self.r3,
            SwitchKey::R4 => &self.r4,
            SwitchKey::R5 => &self.r5,
            SwitchKey::R6 => &self.r6,
            SwitchKey::R7 => &self.r7,
        }
    }

    pub fn switches(&self) -> impl Iterator<Item = (SwitchKey, &SwitchState)> {
        SwitchKey::ALL.into_iter().map(move |key| (key, self.switch(key)))
    }

    /// The activated channel as an index, if it is in range
    pub fn active_channel_index(&self) -> Option<usize> {
        usize::try_from(self.activated_channel)
            .ok()
            .filter(|idx| *idx < CHANNEL_COUNT)
    }
}

/// Highlight flags for the channel buttons: exactly one set when `activated`
/// is in range, none otherwise.
pub fn button_colors_for(activated: i64) -> [bool; CHANNEL_COUNT] {
    let mut colors = [false; CHANNEL_COUNT];
    if let Some(idx) = usize::try_from(activated)
        .ok()
        .filter(|idx| *idx < CHANNEL_COUNT)
    {
        colors[idx] = true;
    }
    colors
}

/// Display labels for the eight channel buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLabels {
    pub label_0: String,
    pub label_1: String,
    pub label_2: String,
    pub label_3: String,
    pub label_4: String,
    pub label_5: String,
    pub label_6: String,
    pub label_7: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            label_0: "Ch 1".to_string(),
            label_1: "Ch 2".to_string(),
            label_2: "Ch 3".to_string(),
            label_3: "Ch 4".to_string(),
            label_4: "Ch 5".to_string(),
            label_5: "Ch 6".to_string(),
            label_6: "Ch 7".to_string(),
            label_7: "Ch 8".to_string(),
        }
    }
}

impl ButtonLabels {
    pub fn get(&self, slot: usize) -> Option<&str> {
        let label = match slot {
            0 => &self.label_0,
            1 => &self.label_1,
            2 => &self.label_2,
            3 => &self.label_3,
            4 => &self.label_4,
            5 => &self.label_5,
            6 => &self.label_6,
            7 => &self.label_7,
            _ => return None,
        };
        Some(label.as_str())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut String> {
        match slot {
            0 => Some(&mut self.label_0),
            1 => Some(&mut self.label_1),
            2 => Some(&mut self.label_2),
            3 => Some(&mut self.label_3),
            4 => Some(&mut self.label_4),
            5 => Some(&mut self.label_5),
            6 => Some(&mut self.label_6),
            7 => Some(&mut self.label_7),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        (0..CHANNEL_COUNT).filter_map(move |slot| self.get(slot))
    }
}

/// Device operating settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub cryo_mode: bool,
    pub cryo_voltage: f64,
    pub regular_voltage: f64,
    pub tree_memory_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cryo_mode: false,
            cryo_voltage: 2.0,
            regular_voltage: 2.0,
            tree_memory_mode: false,
        }
    }
}

/// Body exchanged with `/settings`: device settings plus the optional title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPayload {
    #[serde(flatten)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_label: Option<String>,
}

/// Confirmation token attached to hardware-affecting requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub verified: bool,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(rename = "userConfirmed")]
    pub user_confirmed: bool,
}

impl Verification {
    /// Token stamped with the current wall-clock time
    pub fn now(user_confirmed: bool) -> Self {
        Self {
            verified: true,
            timestamp: chrono::Utc::now().timestamp_millis(),
            user_confirmed,
        }
    }
}

/// Body of `POST /channel`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRequest {
    pub number: i64,
    pub verification: Verification,
}

/// Body of `POST /switch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRequest {
    pub number: u8,
    pub verification: Verification,
}

/// Body of `POST /reset` and `POST /re_assert`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub verification: Verification,
}

/// Aggregate snapshot returned once by `/initialize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializationResponse {
    pub tree_state: TreeState,
    #[serde(default)]
    pub button_labels: Option<ButtonLabels>,
    #[serde(default)]
    pub settings: Option<SettingsPayload>,
}

/// Reply of `POST /cleanup`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub ok: bool,
}
