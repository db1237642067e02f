//! Device adapter — links one local entity to a remote device channel.
//!
//! An adapter owns exactly one (address, channel) pair's worth of cache
//! entries. Node names irrelevant to its channel/parameter selection are
//! never cached, so push events for them are ignored. Once linked, an
//! adapter never reverts to unlinked; only its availability toggles with
//! the remote unreachable flag.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use hmbridge_domain::attribute::map_status_attribute;
use hmbridge_domain::device::RemoteDevice;
use hmbridge_domain::entity_config::DeviceEntityConfig;
use hmbridge_domain::event::BridgeEvent;
use hmbridge_domain::naming::compose_name;
use hmbridge_domain::node::UNREACH_NODE;
use hmbridge_domain::value::Value;

use crate::event_bus::EventBus;
use crate::kind::DeviceKind;
use crate::ports::hub::HubConnection;
use crate::router::EventRouter;

/// Where an adapter stands in its linking lifecycle.
///
/// `Linked` is terminal success; `LinkFailed` is reached only when the
/// initial metadata pull fails, and is not retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Unlinked,
    Linking,
    Linked,
    LinkFailed,
}

struct AdapterState {
    link: LinkState,
    /// Last-known value per cached node; `None` until first seen.
    cache: HashMap<String, Option<Value>>,
    available: bool,
    device: Option<RemoteDevice>,
}

/// Generic per-entity adapter for one remote device channel.
pub struct DeviceAdapter<H> {
    hub: Arc<H>,
    bus: EventBus,
    kind: DeviceKind,
    name: String,
    address: String,
    channel: u32,
    main_param: Option<String>,
    link_delay: Duration,
    state: Mutex<AdapterState>,
}

impl<H: HubConnection> DeviceAdapter<H> {
    /// Build an adapter from a discovery config.
    ///
    /// The config's parameter is upper-cased and becomes the primary
    /// cache entry; kinds with a fixed primary node supply it when the
    /// config names none. A missing name is composed from the address.
    #[must_use]
    pub fn new(
        hub: Arc<H>,
        bus: EventBus,
        config: DeviceEntityConfig,
        link_delay: Duration,
    ) -> Self {
        let kind = DeviceKind::from(config.category);
        let main_param = config
            .param
            .map(|param| param.to_uppercase())
            .or_else(|| kind.default_main_param().map(str::to_string));
        let name = if config.name.is_empty() {
            compose_name(&config.address, config.channel, main_param.as_deref())
        } else {
            config.name
        };
        Self {
            hub,
            bus,
            kind,
            name,
            address: config.address,
            channel: config.channel,
            main_param,
            link_delay,
            state: Mutex::new(AdapterState {
                link: LinkState::Unlinked,
                cache: HashMap::new(),
                available: false,
                device: None,
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn channel(&self) -> u32 {
        self.channel
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Current lifecycle state.
    pub async fn link_state(&self) -> LinkState {
        self.state.lock().await.link
    }

    pub async fn is_linked(&self) -> bool {
        self.link_state().await == LinkState::Linked
    }

    /// Whether the remote device is reachable.
    pub async fn available(&self) -> bool {
        self.state.lock().await.available
    }

    /// Link this adapter to its remote device.
    ///
    /// No-op when already linked. Returns `false` without linking when
    /// the hub connection is down or the address is unknown to it.
    /// Otherwise initialises the cache, optionally pauses for the
    /// configured inter-link delay (rate-limiting the hub during bulk
    /// autodiscovery), pulls all cache-relevant values once, and
    /// subscribes every implied channel with the router. A pull failure
    /// leaves the adapter in [`LinkState::LinkFailed`] with the error
    /// logged; there is no automatic retry.
    pub async fn link(self: &Arc<Self>, router: &EventRouter<H>) -> bool {
        let mut state = self.state.lock().await;
        if state.link == LinkState::Linked {
            return true;
        }
        if !self.hub.is_connected() {
            return false;
        }
        let Some(device) = self.hub.device(&self.address).await else {
            tracing::debug!(address = %self.address, "device not known to hub connection");
            return false;
        };

        tracing::info!(address = %self.address, name = %self.name, "start linking");
        state.link = LinkState::Linking;
        state.cache.clear();
        for node in device.attribute_nodes.keys() {
            state.cache.insert(node.clone(), None);
        }
        for node in self.kind.data_nodes(self.main_param.as_deref()) {
            state.cache.insert(node, None);
        }

        if !self.link_delay.is_zero() {
            // Pause between links so bulk autodiscovery does not hammer
            // the CCU/Homegear.
            tokio::time::sleep(self.link_delay).await;
        }

        for (_role, map) in device.readable_node_maps() {
            for node in map.keys() {
                if !state.cache.contains_key(node) {
                    continue;
                }
                match self.hub.read_value(&self.address, self.channel, node).await {
                    Ok(value) => {
                        state.cache.insert(node.clone(), Some(value));
                    }
                    Err(err) => {
                        state.link = LinkState::LinkFailed;
                        state.available = false;
                        tracing::error!(address = %self.address, error = %err, "linking failed");
                        return false;
                    }
                }
            }
        }

        let mut channels: BTreeSet<u32> = BTreeSet::new();
        for (_role, map) in device.all_node_maps() {
            for (node, binding) in map {
                if state.cache.contains_key(node) {
                    channels.insert(binding.resolve(self.channel));
                }
            }
        }
        for channel in channels {
            tracing::debug!(address = %self.address, channel, "subscribe channel");
            router.attach(&self.address, channel, Arc::clone(self));
        }

        state.available = !device.unreachable;
        state.device = Some(device);
        state.link = LinkState::Linked;
        tracing::debug!(name = %self.name, "linking done");
        true
    }

    /// Apply one push event.
    ///
    /// Updates the cache on a delta, flips availability when the
    /// unreachable flag arrives, and publishes a state refresh when
    /// anything changed. Node names outside the cache no-op silently.
    pub async fn on_event(&self, node: &str, value: Value) {
        let mut state = self.state.lock().await;
        let mut changed = false;

        if let Some(slot) = state.cache.get_mut(node) {
            if slot.as_ref() != Some(&value) {
                *slot = Some(value.clone());
                changed = true;
            }
        }

        if node == UNREACH_NODE {
            state.available = !value.is_truthy();
            changed = true;
        }

        drop(state);
        if changed {
            tracing::debug!(name = %self.name, node, "state refresh after event");
            self.bus.publish(BridgeEvent::state_changed(&self.name));
        }
    }

    /// Read one cached node value.
    pub async fn node_value(&self, node: &str) -> Option<Value> {
        self.state.lock().await.cache.get(node).cloned().flatten()
    }

    /// Read the primary cache entry.
    pub async fn main_value(&self) -> Option<Value> {
        match &self.main_param {
            Some(param) => self.node_value(param).await,
            None => None,
        }
    }

    /// Write the primary cache entry.
    pub async fn set_main_value(&self, value: Value) {
        let Some(param) = &self.main_param else {
            return;
        };
        let mut state = self.state.lock().await;
        if let Some(slot) = state.cache.get_mut(param) {
            *slot = Some(value);
        }
    }

    /// Display attributes derived from the status-attribute table, plus
    /// the device address as `ID`. Empty while unavailable.
    pub async fn attributes(&self) -> HashMap<&'static str, Value> {
        let state = self.state.lock().await;
        let mut attrs = HashMap::new();
        if !state.available {
            return attrs;
        }
        for (node, value) in &state.cache {
            if let Some(value) = value {
                if let Some((label, display)) = map_status_attribute(node, value) {
                    attrs.insert(label, display);
                }
            }
        }
        if let Some(device) = &state.device {
            attrs.insert("ID", Value::Text(device.address.clone()));
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHub;
    use hmbridge_domain::category::DeviceCategory;
    use hmbridge_domain::node::ChannelBinding;

    fn switch_device() -> RemoteDevice {
        let mut device = RemoteDevice::new("NEQ0012345", "Kitchen Switch", "Switch");
        device
            .write_nodes
            .insert("STATE".to_string(), ChannelBinding::ChannelBound);
        device
            .attribute_nodes
            .insert(UNREACH_NODE.to_string(), ChannelBinding::Unspecified);
        device
            .attribute_nodes
            .insert("RSSI_DEVICE".to_string(), ChannelBinding::Fixed(0));
        device
    }

    fn switch_config() -> DeviceEntityConfig {
        DeviceEntityConfig {
            category: DeviceCategory::Switch,
            address: "NEQ0012345".to_string(),
            name: "Kitchen Switch".to_string(),
            channel: 1,
            param: None,
        }
    }

    fn setup(hub: &Arc<TestHub>) -> (Arc<DeviceAdapter<TestHub>>, EventRouter<TestHub>, EventBus) {
        let bus = EventBus::new(16);
        let router = EventRouter::new(Arc::clone(hub), bus.clone());
        let adapter = Arc::new(DeviceAdapter::new(
            Arc::clone(hub),
            bus.clone(),
            switch_config(),
            Duration::ZERO,
        ));
        (adapter, router, bus)
    }

    #[tokio::test]
    async fn should_link_and_pull_initial_values() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        hub.set_node_value("NEQ0012345", 1, "STATE", Value::Bool(true))
            .await;
        let (adapter, router, _bus) = setup(&hub);

        assert!(adapter.link(&router).await);
        assert!(adapter.is_linked().await);
        assert!(adapter.available().await);
        assert_eq!(adapter.main_value().await, Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn should_not_pull_again_when_linked_twice() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, _bus) = setup(&hub);

        assert!(adapter.link(&router).await);
        let reads_after_first = hub.read_call_count();
        assert!(adapter.link(&router).await);
        assert_eq!(hub.read_call_count(), reads_after_first);
    }

    #[tokio::test]
    async fn should_stay_unlinked_for_unknown_address() {
        let hub = Arc::new(TestHub::default());
        let (adapter, router, _bus) = setup(&hub);

        assert!(!adapter.link(&router).await);
        assert_eq!(adapter.link_state().await, LinkState::Unlinked);
    }

    #[tokio::test]
    async fn should_stay_unlinked_when_hub_disconnected() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        hub.set_connected(false);
        let (adapter, router, _bus) = setup(&hub);

        assert!(!adapter.link(&router).await);
        assert!(!adapter.is_linked().await);
    }

    #[tokio::test]
    async fn should_enter_link_failed_when_pull_errors() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        hub.fail_reads(true);
        let (adapter, router, _bus) = setup(&hub);

        assert!(!adapter.link(&router).await);
        assert_eq!(adapter.link_state().await, LinkState::LinkFailed);
        assert!(!adapter.available().await);
    }

    #[tokio::test]
    async fn should_update_cache_and_publish_on_event_delta() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, bus) = setup(&hub);
        adapter.link(&router).await;
        let mut rx = bus.subscribe();

        adapter.on_event("STATE", Value::Bool(true)).await;

        assert_eq!(adapter.main_value().await, Some(Value::Bool(true)));
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn should_not_publish_for_unchanged_value() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        hub.set_node_value("NEQ0012345", 1, "STATE", Value::Bool(false))
            .await;
        let (adapter, router, bus) = setup(&hub);
        adapter.link(&router).await;
        let mut rx = bus.subscribe();

        adapter.on_event("STATE", Value::Bool(false)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_ignore_node_outside_cache() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, bus) = setup(&hub);
        adapter.link(&router).await;
        let mut rx = bus.subscribe();

        adapter.on_event("HUMIDITY", Value::Float(55.0)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(adapter.node_value("HUMIDITY").await, None);
    }

    #[tokio::test]
    async fn should_toggle_availability_on_unreach_flag() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, bus) = setup(&hub);
        adapter.link(&router).await;
        assert!(adapter.available().await);
        let mut rx = bus.subscribe();

        adapter.on_event(UNREACH_NODE, Value::Bool(true)).await;
        assert!(!adapter.available().await);
        assert!(rx.try_recv().is_ok());

        adapter.on_event(UNREACH_NODE, Value::Bool(false)).await;
        assert!(adapter.available().await);
    }

    #[tokio::test]
    async fn should_remain_linked_while_unavailable() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, _bus) = setup(&hub);
        adapter.link(&router).await;

        adapter.on_event(UNREACH_NODE, Value::Bool(true)).await;

        assert!(adapter.is_linked().await);
        assert!(!adapter.available().await);
    }

    #[tokio::test]
    async fn should_expose_mapped_attributes_and_id() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        hub.set_node_value("NEQ0012345", 1, "RSSI_DEVICE", Value::Int(-71))
            .await;
        let (adapter, router, _bus) = setup(&hub);
        adapter.link(&router).await;

        let attrs = adapter.attributes().await;
        assert_eq!(attrs.get("RSSI"), Some(&Value::Int(-71)));
        assert_eq!(
            attrs.get("ID"),
            Some(&Value::Text("NEQ0012345".to_string()))
        );
    }

    #[tokio::test]
    async fn should_hide_attributes_while_unavailable() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, _bus) = setup(&hub);
        adapter.link(&router).await;
        adapter.on_event(UNREACH_NODE, Value::Bool(true)).await;

        assert!(adapter.attributes().await.is_empty());
    }

    #[tokio::test]
    async fn should_receive_events_through_router_subscription() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, _bus) = setup(&hub);
        adapter.link(&router).await;

        router
            .dispatch(crate::ports::hub::HubEvent {
                source: "NEQ0012345:1".to_string(),
                interface_id: "hmbridge".to_string(),
                node: "STATE".to_string(),
                value: Value::Bool(true),
            })
            .await;

        assert_eq!(adapter.main_value().await, Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn should_write_main_value_into_cache() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch_device()).await;
        let (adapter, router, _bus) = setup(&hub);
        adapter.link(&router).await;

        adapter.set_main_value(Value::Bool(true)).await;
        assert_eq!(adapter.main_value().await, Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn should_uppercase_config_param() {
        let hub = Arc::new(TestHub::default());
        let config = DeviceEntityConfig {
            category: DeviceCategory::Sensor,
            address: "NEQ0012345".to_string(),
            name: "Meter POWER".to_string(),
            channel: 1,
            param: Some("power".to_string()),
        };
        let adapter = DeviceAdapter::new(hub, EventBus::new(4), config, Duration::ZERO);
        assert_eq!(adapter.main_param, Some("POWER".to_string()));
    }
}
