//! Bridge events — what the core emits towards the hosting platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event published on the bridge event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeEvent {
    /// What happened.
    #[serde(flatten)]
    pub kind: BridgeEventKind,
    /// When the bridge observed it.
    pub timestamp: DateTime<Utc>,
}

/// The payload of a [`BridgeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEventKind {
    /// A key was pressed on a remote device. Impulse events carry no
    /// `param`.
    Keypress {
        /// Display name of the device.
        name: String,
        /// The press variant (`PRESS_SHORT`, …); absent for impulses.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        param: Option<String>,
        /// Channel the press arrived on.
        channel: u32,
    },
    /// An entity's state or availability changed and the platform should
    /// refresh it.
    StateChanged {
        /// Display name of the entity.
        entity: String,
    },
}

impl BridgeEvent {
    /// A keypress event stamped with the current time.
    #[must_use]
    pub fn keypress(name: impl Into<String>, param: Option<String>, channel: u32) -> Self {
        Self {
            kind: BridgeEventKind::Keypress {
                name: name.into(),
                param,
                channel,
            },
            timestamp: Utc::now(),
        }
    }

    /// A state-refresh event stamped with the current time.
    #[must_use]
    pub fn state_changed(entity: impl Into<String>) -> Self {
        Self {
            kind: BridgeEventKind::StateChanged {
                entity: entity.into(),
            },
            timestamp: Utc::now(),
        }
    }
}
