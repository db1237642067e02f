//! Simulated hub error types.

use hmbridge_domain::error::BridgeError;

/// Errors specific to the simulated hub.
#[derive(Debug, thiserror::Error)]
pub enum SimHubError {
    /// The requested device is not part of the simulated fleet.
    #[error("unknown device {0}")]
    UnknownDevice(String),

    /// The requested node does not exist on the device.
    #[error("device {address} has no node {node}")]
    UnknownNode {
        /// Physical device address.
        address: String,
        /// Node name that was requested.
        node: String,
    },

    /// The node exists but cannot be written or triggered.
    #[error("node {node} on {address} is not writable")]
    NotWritable {
        /// Physical device address.
        address: String,
        /// Node name that was requested.
        node: String,
    },
}

impl SimHubError {
    /// Convert into a [`BridgeError::Hub`] for propagation across the
    /// port boundary.
    #[must_use]
    pub fn into_bridge(self) -> BridgeError {
        BridgeError::Hub(Box::new(self))
    }
}
