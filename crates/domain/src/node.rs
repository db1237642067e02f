//! Node metadata — channel bindings and reserved node names.
//!
//! A node is a named data point a device exposes for a channel. The hub
//! reports where a node lives with a loosely-typed indicator: the string
//! `"c"` (one instance per channel), nothing at all, or a fixed channel
//! number. [`ChannelBinding`] is the tagged form of that indicator,
//! resolved once at classification time.

use std::collections::HashMap;

/// Maps a node name to where it lives on the device.
pub type NodeMap = HashMap<String, ChannelBinding>;

/// Where a node lives relative to a device's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelBinding {
    /// One instance of the node exists per channel (wire form `"c"`).
    ChannelBound,
    /// The hub gave no indicator; treated like a channel-bound node.
    Unspecified,
    /// The node lives on exactly one channel.
    Fixed(u32),
}

impl ChannelBinding {
    /// Whether the node follows the current channel rather than a fixed one.
    #[must_use]
    pub fn is_channel_linked(self) -> bool {
        matches!(self, Self::ChannelBound | Self::Unspecified)
    }

    /// The concrete channel to subscribe for an adapter bound to
    /// `current_channel`.
    #[must_use]
    pub fn resolve(self, current_channel: u32) -> u32 {
        match self {
            Self::ChannelBound | Self::Unspecified => current_channel,
            Self::Fixed(channel) => channel,
        }
    }

    /// Parse the loose wire form: `"c"`, `null`, or an integer.
    ///
    /// Anything unrecognised falls back to [`Self::Unspecified`], matching
    /// the hub's permissive handling of metadata.
    #[must_use]
    pub fn from_wire(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::String(s) if s == "c" => Self::ChannelBound,
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map_or(Self::Unspecified, Self::Fixed),
            _ => Self::Unspecified,
        }
    }
}

/// The reserved node carrying the device's unreachable flag.
pub const UNREACH_NODE: &str = "UNREACH";

/// Event nodes that translate into keypress bus events.
pub const PRESS_EVENT_NODES: &[&str] = &[
    "PRESS_SHORT",
    "PRESS_LONG",
    "PRESS_CONT",
    "PRESS_LONG_RELEASE",
];

/// Event nodes that fold into a keypress event without a parameter.
pub const IMPULSE_EVENT_NODES: &[&str] = &["SEQUENCE_OK"];

/// Nodes never turned into discovered entities.
pub const IGNORED_DISCOVERY_NODES: &[&str] = &["ACTUAL_TEMPERATURE", "ACTUAL_HUMIDITY"];
