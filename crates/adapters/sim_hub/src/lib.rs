//! # hmbridge-adapter-sim-hub
//!
//! Simulated hub connection for testing and demonstration. Keeps the
//! whole CCU state in memory and pushes the same broadcast streams a
//! real transport would.
//!
//! ## Demo fleet
//!
//! | Device | Address | Class |
//! |--------|---------|-------|
//! | Desk Switch | `NEQ0123456` | `Switch` |
//! | Living Room Dimmer | `OEQ0775472` | `Dimmer` |
//! | Hall Motion | `LEQ1335596` | `Motion` |
//! | Wall Remote | `KEQ0839576` | `Remote` |
//!
//! ## Dependency rule
//!
//! Depends on `hmbridge-app` (port traits) and `hmbridge-domain` only.

mod devices;
mod error;

pub use error::SimHubError;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

use hmbridge_app::ports::hub::{HubConnection, HubEvent, ServiceMessage, SystemNotification};
use hmbridge_domain::device::{DeviceDescription, RemoteDevice};
use hmbridge_domain::error::BridgeError;
use hmbridge_domain::node::UNREACH_NODE;
use hmbridge_domain::value::Value;

/// An in-memory hub connection.
///
/// Paramset reads and writes resolve against a local store; writes and
/// triggered actions echo back on the event stream the way a CCU
/// acknowledges them.
pub struct SimHub {
    interface_id: String,
    connected: AtomicBool,
    devices: Mutex<HashMap<String, RemoteDevice>>,
    values: Mutex<HashMap<(String, u32, String), Value>>,
    variables: Mutex<HashMap<String, Value>>,
    service_messages: Mutex<Vec<ServiceMessage>>,
    system_tx: broadcast::Sender<SystemNotification>,
    events_tx: broadcast::Sender<HubEvent>,
}

impl SimHub {
    /// Create an empty, connected hub.
    #[must_use]
    pub fn new(interface_id: impl Into<String>) -> Self {
        let (system_tx, _) = broadcast::channel(16);
        let (events_tx, _) = broadcast::channel(256);
        Self {
            interface_id: interface_id.into(),
            connected: AtomicBool::new(true),
            devices: Mutex::new(HashMap::new()),
            values: Mutex::new(HashMap::new()),
            variables: Mutex::new(HashMap::new()),
            service_messages: Mutex::new(Vec::new()),
            system_tx,
            events_tx,
        }
    }

    /// Create a hub preloaded with the demo fleet and two system
    /// variables (`Presence`, `Brightness`).
    #[must_use]
    pub fn demo() -> Self {
        let hub = Self::new("sim-rf");
        for (device, seeds) in devices::demo_fleet() {
            let address = device.address.clone();
            hub.install_device(device);
            for (channel, node, value) in seeds {
                hub.values
                    .lock()
                    .unwrap()
                    .insert((address.clone(), channel, node.to_string()), value);
            }
        }
        hub.seed_variable("Presence", Value::Bool(false));
        hub.seed_variable("Brightness", Value::Float(0.0));
        hub
    }

    /// Add a device to the fleet without announcing it.
    pub fn install_device(&self, device: RemoteDevice) {
        self.devices
            .lock()
            .unwrap()
            .insert(device.address.clone(), device);
    }

    /// Announce the whole fleet as a `newDevices` notification, one
    /// description per physical device plus one per channel.
    pub fn announce_devices(&self) {
        let descriptions: Vec<DeviceDescription> = self
            .devices
            .lock()
            .unwrap()
            .values()
            .flat_map(|device| {
                std::iter::once(DeviceDescription::new(device.address.clone())).chain(
                    (1..=device.element_count)
                        .map(|channel| DeviceDescription::new(format!("{}:{channel}", device.address))),
                )
            })
            .collect();
        let _ = self.system_tx.send(SystemNotification::NewDevices {
            interface_id: self.interface_id.clone(),
            descriptions,
        });
    }

    /// Update a node value locally and push the change event, the way
    /// the simulated radio would report it.
    pub fn push_value(&self, address: &str, channel: u32, node: &str, value: Value) {
        self.values.lock().unwrap().insert(
            (address.to_string(), channel, node.to_string()),
            value.clone(),
        );
        self.push_event(address, channel, node, value);
    }

    /// Push a raw event without touching the paramset store. Key press
    /// events work this way: the press is reported but never readable.
    pub fn push_event(&self, address: &str, channel: u32, node: &str, value: Value) {
        let _ = self.events_tx.send(HubEvent {
            source: format!("{address}:{channel}"),
            interface_id: self.interface_id.clone(),
            node: node.to_string(),
            value,
        });
    }

    /// Flip a device's reachability and report it as an `UNREACH` push.
    pub fn set_unreachable(&self, address: &str, unreachable: bool) {
        if let Some(device) = self.devices.lock().unwrap().get_mut(address) {
            device.unreachable = unreachable;
        }
        self.push_value(address, 0, UNREACH_NODE, Value::Bool(unreachable));
    }

    pub fn seed_variable(&self, name: &str, value: Value) {
        self.variables
            .lock()
            .unwrap()
            .insert(name.to_string(), value);
    }

    pub fn seed_service_messages(&self, messages: Vec<ServiceMessage>) {
        *self.service_messages.lock().unwrap() = messages;
    }

    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!(interface_id = %self.interface_id, "simulated hub connected");
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        tracing::info!(interface_id = %self.interface_id, "simulated hub disconnected");
    }

    fn device_snapshot(&self, address: &str) -> Option<RemoteDevice> {
        self.devices.lock().unwrap().get(address).cloned()
    }

    fn ensure_connected(&self) -> Result<(), BridgeError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(BridgeError::Disconnected)
        }
    }
}

impl HubConnection for SimHub {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn devices(&self) -> HashMap<String, RemoteDevice> {
        self.devices.lock().unwrap().clone()
    }

    async fn device(&self, address: &str) -> Option<RemoteDevice> {
        self.device_snapshot(address)
    }

    async fn read_value(
        &self,
        address: &str,
        channel: u32,
        node: &str,
    ) -> Result<Value, BridgeError> {
        self.ensure_connected()?;
        let device = self
            .device_snapshot(address)
            .ok_or_else(|| SimHubError::UnknownDevice(address.to_string()).into_bridge())?;
        if !device.all_node_maps().any(|(_, map)| map.contains_key(node)) {
            return Err(SimHubError::UnknownNode {
                address: address.to_string(),
                node: node.to_string(),
            }
            .into_bridge());
        }
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(&(address.to_string(), channel, node.to_string()))
            .cloned()
            .unwrap_or(Value::Int(0)))
    }

    async fn write_value(
        &self,
        address: &str,
        channel: u32,
        node: &str,
        value: Value,
    ) -> Result<(), BridgeError> {
        self.ensure_connected()?;
        let device = self
            .device_snapshot(address)
            .ok_or_else(|| SimHubError::UnknownDevice(address.to_string()).into_bridge())?;
        if !device.write_nodes.contains_key(node) {
            return Err(SimHubError::NotWritable {
                address: address.to_string(),
                node: node.to_string(),
            }
            .into_bridge());
        }
        self.push_value(address, channel, node, value);
        Ok(())
    }

    async fn trigger_action(
        &self,
        address: &str,
        channel: u32,
        node: &str,
        repeat: u32,
    ) -> Result<(), BridgeError> {
        self.ensure_connected()?;
        let device = self
            .device_snapshot(address)
            .ok_or_else(|| SimHubError::UnknownDevice(address.to_string()).into_bridge())?;
        if !device.action_nodes.contains_key(node) {
            return Err(SimHubError::NotWritable {
                address: address.to_string(),
                node: node.to_string(),
            }
            .into_bridge());
        }
        for _ in 0..repeat {
            self.push_event(address, channel, node, Value::Bool(true));
        }
        Ok(())
    }

    async fn get_all_system_variables(&self) -> Result<HashMap<String, Value>, BridgeError> {
        self.ensure_connected()?;
        Ok(self.variables.lock().unwrap().clone())
    }

    async fn set_system_variable(&self, name: &str, value: Value) -> Result<(), BridgeError> {
        self.ensure_connected()?;
        self.variables
            .lock()
            .unwrap()
            .insert(name.to_string(), value);
        Ok(())
    }

    async fn get_service_messages(&self) -> Result<Vec<ServiceMessage>, BridgeError> {
        self.ensure_connected()?;
        Ok(self.service_messages.lock().unwrap().clone())
    }

    fn system_notifications(&self) -> broadcast::Receiver<SystemNotification> {
        self.system_tx.subscribe()
    }

    fn events(&self) -> broadcast::Receiver<HubEvent> {
        self.events_tx.subscribe()
    }
}
