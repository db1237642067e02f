//! Event router — dispatches raw hub push callbacks.
//!
//! A single consuming task feeds every [`HubEvent`] through
//! [`EventRouter::dispatch`], which fans it out to the device adapters
//! registered for the (address, channel) pair and, for devices watched
//! with a bequeathed subscription, translates press/impulse event nodes
//! into keypress bus events. Push callbacks fan out broadly, so events
//! nobody cares about are routine and dropped silently.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use hmbridge_domain::event::BridgeEvent;
use hmbridge_domain::node::{IMPULSE_EVENT_NODES, PRESS_EVENT_NODES};

use crate::adapter::DeviceAdapter;
use crate::event_bus::EventBus;
use crate::ports::hub::{HubConnection, HubEvent};

/// Routes raw push callbacks to adapters and the keypress event bus.
pub struct EventRouter<H> {
    hub: Arc<H>,
    bus: EventBus,
    /// Devices watched with a bequeathed (device-root) subscription.
    watched: Mutex<HashSet<String>>,
    /// Adapters subscribed per (address, channel).
    adapters: Mutex<HashMap<(String, u32), Vec<Arc<DeviceAdapter<H>>>>>,
}

impl<H: HubConnection> EventRouter<H> {
    /// Create a router over the given hub connection and event bus.
    #[must_use]
    pub fn new(hub: Arc<H>, bus: EventBus) -> Self {
        Self {
            hub,
            bus,
            watched: Mutex::new(HashSet::new()),
            adapters: Mutex::new(HashMap::new()),
        }
    }

    /// Watch a device's event nodes, bequeathing to all its channels.
    pub fn watch_device(&self, address: &str) {
        self.watched.lock().unwrap().insert(address.to_string());
    }

    /// Subscribe an adapter to one channel of a device.
    pub fn attach(&self, address: &str, channel: u32, adapter: Arc<DeviceAdapter<H>>) {
        self.adapters
            .lock()
            .unwrap()
            .entry((address.to_string(), channel))
            .or_default()
            .push(adapter);
    }

    /// Dispatch one raw push callback.
    pub async fn dispatch(&self, event: HubEvent) {
        let Some((address, channel)) = parse_source(&event.source) else {
            tracing::error!(source = %event.source, "cannot parse event source channel");
            return;
        };

        let subscribed: Vec<Arc<DeviceAdapter<H>>> = {
            let adapters = self.adapters.lock().unwrap();
            adapters
                .get(&(address.to_string(), channel))
                .cloned()
                .unwrap_or_default()
        };
        for adapter in subscribed {
            adapter.on_event(&event.node, event.value.clone()).await;
        }

        if !self.watched.lock().unwrap().contains(address) {
            return;
        }
        let Some(device) = self.hub.device(address).await else {
            return;
        };
        if !device.event_nodes.contains_key(&event.node) {
            return;
        }

        tracing::debug!(node = %event.node, device = %device.name, channel, "device event");

        let node = event.node.as_str();
        if PRESS_EVENT_NODES.contains(&node) {
            self.bus
                .publish(BridgeEvent::keypress(&device.name, Some(event.node), channel));
        } else if IMPULSE_EVENT_NODES.contains(&node) {
            self.bus
                .publish(BridgeEvent::keypress(&device.name, None, channel));
        } else {
            tracing::warn!(node = %event.node, "event not forwarded");
        }
    }

    /// Consume the hub's event stream until it closes.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<HubEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.dispatch(event).await,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

fn parse_source(source: &str) -> Option<(&str, u32)> {
    let (address, channel) = source.split_once(':')?;
    if address.is_empty() {
        return None;
    }
    channel.parse().ok().map(|channel| (address, channel))
}
