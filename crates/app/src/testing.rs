//! In-memory hub connection fake shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::broadcast;

use hmbridge_domain::device::RemoteDevice;
use hmbridge_domain::error::BridgeError;
use hmbridge_domain::value::Value;

use crate::ports::hub::{HubConnection, HubEvent, ServiceMessage, SystemNotification};

/// Scripted [`HubConnection`] recording every call.
pub(crate) struct TestHub {
    connected: AtomicBool,
    fail_reads: AtomicBool,
    devices: Mutex<HashMap<String, RemoteDevice>>,
    values: Mutex<HashMap<(String, u32, String), Value>>,
    variables: Mutex<HashMap<String, Value>>,
    service_messages: Mutex<Vec<ServiceMessage>>,
    read_calls: AtomicUsize,
    service_message_calls: AtomicUsize,
    variable_list_calls: AtomicUsize,
    pub(crate) action_calls: Mutex<Vec<(String, u32, String, u32)>>,
    pub(crate) variable_writes: Mutex<Vec<(String, Value)>>,
    system_tx: broadcast::Sender<SystemNotification>,
    events_tx: broadcast::Sender<HubEvent>,
}

impl Default for TestHub {
    fn default() -> Self {
        let (system_tx, _) = broadcast::channel(16);
        let (events_tx, _) = broadcast::channel(64);
        Self {
            connected: AtomicBool::new(true),
            fail_reads: AtomicBool::new(false),
            devices: Mutex::new(HashMap::new()),
            values: Mutex::new(HashMap::new()),
            variables: Mutex::new(HashMap::new()),
            service_messages: Mutex::new(Vec::new()),
            read_calls: AtomicUsize::new(0),
            service_message_calls: AtomicUsize::new(0),
            variable_list_calls: AtomicUsize::new(0),
            action_calls: Mutex::new(Vec::new()),
            variable_writes: Mutex::new(Vec::new()),
            system_tx,
            events_tx,
        }
    }
}

impl TestHub {
    pub(crate) async fn add_device(&self, device: RemoteDevice) {
        self.devices
            .lock()
            .unwrap()
            .insert(device.address.clone(), device);
    }

    pub(crate) async fn set_node_value(&self, address: &str, channel: u32, node: &str, value: Value) {
        self.values.lock().unwrap().insert(
            (address.to_string(), channel, node.to_string()),
            value,
        );
    }

    pub(crate) fn seed_variable(&self, name: &str, value: Value) {
        self.variables
            .lock()
            .unwrap()
            .insert(name.to_string(), value);
    }

    pub(crate) fn seed_service_messages(&self, messages: Vec<ServiceMessage>) {
        *self.service_messages.lock().unwrap() = messages;
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn read_call_count(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn service_message_call_count(&self) -> usize {
        self.service_message_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn variable_list_call_count(&self) -> usize {
        self.variable_list_calls.load(Ordering::SeqCst)
    }
}

impl HubConnection for TestHub {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn devices(&self) -> HashMap<String, RemoteDevice> {
        self.devices.lock().unwrap().clone()
    }

    async fn device(&self, address: &str) -> Option<RemoteDevice> {
        self.devices.lock().unwrap().get(address).cloned()
    }

    async fn read_value(
        &self,
        address: &str,
        channel: u32,
        node: &str,
    ) -> Result<Value, BridgeError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BridgeError::hub(std::io::Error::other("scripted read failure")));
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
        self.values.lock().unwrap().insert(
            (address.to_string(), channel, node.to_string()),
            value,
        );
        Ok(())
    }

    async fn trigger_action(
        &self,
        address: &str,
        channel: u32,
        node: &str,
        repeat: u32,
    ) -> Result<(), BridgeError> {
        self.action_calls.lock().unwrap().push((
            address.to_string(),
            channel,
            node.to_string(),
            repeat,
        ));
        Ok(())
    }

    async fn get_all_system_variables(&self) -> Result<HashMap<String, Value>, BridgeError> {
        self.variable_list_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        Ok(self.variables.lock().unwrap().clone())
    }

    async fn set_system_variable(&self, name: &str, value: Value) -> Result<(), BridgeError> {
        if !self.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        self.variables
            .lock()
            .unwrap()
            .insert(name.to_string(), value.clone());
        self.variable_writes
            .lock()
            .unwrap()
            .push((name.to_string(), value));
        Ok(())
    }

    async fn get_service_messages(&self) -> Result<Vec<ServiceMessage>, BridgeError> {
        self.service_message_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        Ok(self.service_messages.lock().unwrap().clone())
    }

    fn system_notifications(&self) -> broadcast::Receiver<SystemNotification> {
        self.system_tx.subscribe()
    }

    fn events(&self) -> broadcast::Receiver<HubEvent> {
        self.events_tx.subscribe()
    }
}
