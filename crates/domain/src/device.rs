//! Remote devices as the hub connection reports them.
//!
//! These descriptors are owned by the hub connection and read-only to the
//! bridge core; their lifecycle (creation, teardown) happens entirely on
//! the hub side.

use crate::node::NodeMap;

/// Which of the six metadata maps a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Attribute,
    Write,
    Sensor,
    Binary,
    Event,
    Action,
}

/// A device known to the hub connection.
#[derive(Debug, Clone, Default)]
pub struct RemoteDevice {
    /// Physical address, e.g. `"NEQ1234567"`.
    pub address: String,
    /// Resolved display name; falls back to the address on the hub side.
    pub name: String,
    /// Device class declared by the hub, e.g. `"Switch"` or `"Motion"`.
    pub device_class: String,
    /// Number of addressable channels (the hub's `ELEMENT`).
    pub element_count: u32,
    /// Read-only sensor readings.
    pub sensor_nodes: NodeMap,
    /// Binary (on/off) readings.
    pub binary_nodes: NodeMap,
    /// Status attributes (battery, RSSI, …).
    pub attribute_nodes: NodeMap,
    /// Writable parameters.
    pub write_nodes: NodeMap,
    /// Push-event triggers (key presses, impulses).
    pub event_nodes: NodeMap,
    /// Invokable actions (virtual key presses).
    pub action_nodes: NodeMap,
    /// Set when the hub lost contact with the device.
    pub unreachable: bool,
}

impl RemoteDevice {
    /// Create a descriptor with the given identity and a single channel.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        device_class: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            device_class: device_class.into(),
            element_count: 1,
            ..Self::default()
        }
    }

    /// The four readable metadata maps, in the order the initial pull
    /// reads them.
    pub fn readable_node_maps(&self) -> impl Iterator<Item = (NodeRole, &NodeMap)> {
        [
            (NodeRole::Attribute, &self.attribute_nodes),
            (NodeRole::Write, &self.write_nodes),
            (NodeRole::Sensor, &self.sensor_nodes),
            (NodeRole::Binary, &self.binary_nodes),
        ]
        .into_iter()
    }

    /// All six metadata maps.
    pub fn all_node_maps(&self) -> impl Iterator<Item = (NodeRole, &NodeMap)> {
        self.readable_node_maps().chain([
            (NodeRole::Event, &self.event_nodes),
            (NodeRole::Action, &self.action_nodes),
        ])
    }
}

/// One entry of a `newDevices` notification payload.
///
/// The hub announces every channel separately (`"NEQ1234567:1"`); only the
/// part before the colon identifies the physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescription {
    /// Raw address, possibly carrying a `:channel` suffix.
    pub address: String,
}

impl DeviceDescription {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// The physical device address with any channel suffix stripped.
    #[must_use]
    pub fn physical_address(&self) -> &str {
        self.address.split(':').next().unwrap_or(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ChannelBinding;

    #[test]
    fn should_strip_channel_suffix_from_description() {
        let desc = DeviceDescription::new("NEQ1234567:3");
        assert_eq!(desc.physical_address(), "NEQ1234567");
    }

    #[test]
    fn should_keep_plain_address_unchanged() {
        let desc = DeviceDescription::new("NEQ1234567");
        assert_eq!(desc.physical_address(), "NEQ1234567");
    }

    #[test]
    fn should_iterate_readable_maps_in_pull_order() {
        let mut device = RemoteDevice::new("ADDR", "Lamp", "Dimmer");
        device
            .write_nodes
            .insert("LEVEL".to_string(), ChannelBinding::ChannelBound);
        let roles: Vec<NodeRole> = device.readable_node_maps().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            vec![
                NodeRole::Attribute,
                NodeRole::Write,
                NodeRole::Sensor,
                NodeRole::Binary
            ]
        );
    }

    #[test]
    fn should_default_to_one_element() {
        let device = RemoteDevice::new("ADDR", "Lamp", "Dimmer");
        assert_eq!(device.element_count, 1);
        assert!(!device.unreachable);
    }
}
