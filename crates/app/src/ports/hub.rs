//! Hub connection port — the opaque RPC client for the remote controller.
//!
//! The wire protocol (XML-RPC/BIN-RPC framing, connection handling) lives
//! behind this trait. The connection runs its own background transport;
//! its pushes arrive on broadcast streams and are therefore concurrent
//! with the synchronous request path. A single consuming task per stream
//! applies them to bridge state.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::broadcast;

use hmbridge_domain::device::{DeviceDescription, RemoteDevice};
use hmbridge_domain::error::BridgeError;
use hmbridge_domain::value::Value;

/// One pending service message on the hub (stuck config, low battery, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    /// Device or channel the message concerns.
    pub address: String,
    /// Message code as the hub reports it.
    pub message: String,
}

/// A system-level notification pushed by the hub connection.
#[derive(Debug, Clone)]
pub enum SystemNotification {
    /// The remote device set grew; one description per announced channel.
    NewDevices {
        /// Interface the announcement came from.
        interface_id: String,
        /// Announced device/channel addresses.
        descriptions: Vec<DeviceDescription>,
    },
}

/// A raw per-node push callback from the hub connection.
#[derive(Debug, Clone)]
pub struct HubEvent {
    /// Colon-delimited `"ADDRESS:CHANNEL"` source string.
    pub source: String,
    /// Interface id of the reporting transport.
    pub interface_id: String,
    /// Node name the value belongs to.
    pub node: String,
    /// The new value.
    pub value: Value,
}

/// The hub connection as consumed by the bridge core.
///
/// Implementations own the [`RemoteDevice`] set; the core only observes
/// it through snapshots. All remote-call failures surface as
/// [`BridgeError::Hub`] and are treated as soft by callers.
pub trait HubConnection: Send + Sync + 'static {
    /// Whether the connection is up.
    fn is_connected(&self) -> bool;

    /// Snapshot of all devices known to the hub, by physical address.
    fn devices(&self) -> impl Future<Output = HashMap<String, RemoteDevice>> + Send;

    /// Look up one device by physical address.
    fn device(&self, address: &str) -> impl Future<Output = Option<RemoteDevice>> + Send;

    /// Read the current value of a node on a channel.
    fn read_value(
        &self,
        address: &str,
        channel: u32,
        node: &str,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send;

    /// Write a value to a writable node on a channel.
    fn write_value(
        &self,
        address: &str,
        channel: u32,
        node: &str,
        value: Value,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Invoke an action node (virtual key press) `repeat` times.
    fn trigger_action(
        &self,
        address: &str,
        channel: u32,
        node: &str,
        repeat: u32,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// All system variables and their current values.
    fn get_all_system_variables(
        &self,
    ) -> impl Future<Output = Result<HashMap<String, Value>, BridgeError>> + Send;

    /// Set a system variable on the hub.
    fn set_system_variable(
        &self,
        name: &str,
        value: Value,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Pending service messages.
    fn get_service_messages(
        &self,
    ) -> impl Future<Output = Result<Vec<ServiceMessage>, BridgeError>> + Send;

    /// Subscribe to system notifications (`newDevices`).
    fn system_notifications(&self) -> broadcast::Receiver<SystemNotification>;

    /// Subscribe to the raw per-node event stream.
    fn events(&self) -> broadcast::Receiver<HubEvent>;
}
