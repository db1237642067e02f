//! Bridge-level services: keypress simulation and variable writes.

use std::collections::HashMap;
use std::sync::Arc;

use hmbridge_domain::value::Value;

use crate::entities::variable::VariableEntity;
use crate::ports::hub::HubConnection;

/// Service entry points exposed by the bridge.
///
/// Invalid requests are logged and dropped without reaching the hub;
/// a service call never propagates an error to its caller.
pub struct BridgeServices<H> {
    hub: Arc<H>,
    variables: HashMap<String, Arc<VariableEntity<H>>>,
}

impl<H: HubConnection> BridgeServices<H> {
    #[must_use]
    pub fn new(hub: Arc<H>, variables: HashMap<String, Arc<VariableEntity<H>>>) -> Self {
        Self { hub, variables }
    }

    /// Simulate a single keypress on a remote device.
    ///
    /// The parameter must be one of the device's action nodes and the
    /// channel must exist on the device.
    pub async fn virtual_key(&self, address: &str, channel: u32, param: &str) {
        if address.is_empty() || param.is_empty() || channel == 0 {
            tracing::error!(address, channel, param, "invalid virtualkey request");
            return;
        }
        let Some(device) = self.hub.device(address).await else {
            tracing::error!(address, "virtualkey: device not found");
            return;
        };
        if !device.action_nodes.contains_key(param) {
            tracing::error!(address, param, "virtualkey: not an action node");
            return;
        }
        if channel > device.element_count {
            tracing::error!(
                address,
                channel,
                elements = device.element_count,
                "virtualkey: channel out of range"
            );
            return;
        }
        if let Err(err) = self.hub.trigger_action(address, channel, param, 1).await {
            tracing::error!(address, channel, param, error = %err, "virtualkey failed");
        }
    }

    /// Write a system variable by name.
    pub async fn set_variable(&self, name: &str, value: Value) {
        let Some(entity) = self.variables.get(name) else {
            tracing::error!(name, "unknown system variable");
            return;
        };
        if let Err(err) = entity.set_on_hub(value).await {
            tracing::error!(name, error = %err, "variable write failed");
        }
    }
}
