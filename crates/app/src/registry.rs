//! Adapter registry — the bundled discovery handler.
//!
//! Constructs one device adapter per discovered config, links it, and
//! keeps it for the process lifetime. A hosting platform with its own
//! entity management can substitute a different
//! [`DiscoveryHandler`](crate::ports::platform::DiscoveryHandler).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hmbridge_domain::category::DeviceCategory;
use hmbridge_domain::entity_config::DeviceEntityConfig;
use hmbridge_domain::error::BridgeError;

use crate::adapter::DeviceAdapter;
use crate::event_bus::EventBus;
use crate::ports::hub::HubConnection;
use crate::ports::platform::DiscoveryHandler;
use crate::router::EventRouter;

/// Creates and owns the device adapters produced by discovery.
pub struct AdapterRegistry<H> {
    hub: Arc<H>,
    bus: EventBus,
    router: Arc<EventRouter<H>>,
    link_delay: Duration,
    adapters: Mutex<HashMap<String, Arc<DeviceAdapter<H>>>>,
}

impl<H: HubConnection> AdapterRegistry<H> {
    #[must_use]
    pub fn new(
        hub: Arc<H>,
        bus: EventBus,
        router: Arc<EventRouter<H>>,
        link_delay: Duration,
    ) -> Self {
        Self {
            hub,
            bus,
            router,
            link_delay,
            adapters: Mutex::new(HashMap::new()),
        }
    }

    /// Look up an adapter by entity name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<DeviceAdapter<H>>> {
        self.adapters.lock().unwrap().get(name).cloned()
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.lock().unwrap().is_empty()
    }

    /// Names of all registered adapters, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<H: HubConnection> DiscoveryHandler for AdapterRegistry<H> {
    async fn setup(
        &self,
        category: DeviceCategory,
        entries: Vec<DeviceEntityConfig>,
    ) -> Result<(), BridgeError> {
        for config in entries {
            tracing::debug!(%category, name = %config.name, "add device from discovery");

            if self.adapters.lock().unwrap().contains_key(&config.name) {
                // Rediscovery cycles re-announce known devices.
                tracing::debug!(name = %config.name, "already registered");
                continue;
            }

            let adapter = Arc::new(DeviceAdapter::new(
                Arc::clone(&self.hub),
                self.bus.clone(),
                config,
                self.link_delay,
            ));
            if !adapter.link(&self.router).await {
                tracing::warn!(name = %adapter.name(), "adapter not linked");
            }
            self.adapters
                .lock()
                .unwrap()
                .insert(adapter.name().to_string(), adapter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHub;
    use hmbridge_domain::device::RemoteDevice;
    use hmbridge_domain::node::ChannelBinding;

    fn registry(hub: &Arc<TestHub>) -> AdapterRegistry<TestHub> {
        let bus = EventBus::new(16);
        let router = Arc::new(EventRouter::new(Arc::clone(hub), bus.clone()));
        AdapterRegistry::new(Arc::clone(hub), bus, router, Duration::ZERO)
    }

    fn switch() -> RemoteDevice {
        let mut device = RemoteDevice::new("NEQ0012345", "Kitchen Switch", "Switch");
        device
            .write_nodes
            .insert("STATE".to_string(), ChannelBinding::ChannelBound);
        device
    }

    fn config() -> DeviceEntityConfig {
        DeviceEntityConfig {
            category: DeviceCategory::Switch,
            address: "NEQ0012345".to_string(),
            name: "Kitchen Switch".to_string(),
            channel: 1,
            param: None,
        }
    }

    #[tokio::test]
    async fn should_register_and_link_discovered_adapter() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch()).await;
        let registry = registry(&hub);

        registry
            .setup(DeviceCategory::Switch, vec![config()])
            .await
            .unwrap();

        assert_eq!(registry.len(), 1);
        let adapter = registry.get("Kitchen Switch").unwrap();
        assert!(adapter.is_linked().await);
    }

    #[tokio::test]
    async fn should_keep_unlinked_adapter_registered() {
        let hub = Arc::new(TestHub::default());
        let registry = registry(&hub);

        registry
            .setup(DeviceCategory::Switch, vec![config()])
            .await
            .unwrap();

        let adapter = registry.get("Kitchen Switch").unwrap();
        assert!(!adapter.is_linked().await);
    }

    #[tokio::test]
    async fn should_not_duplicate_on_rediscovery() {
        let hub = Arc::new(TestHub::default());
        hub.add_device(switch()).await;
        let registry = registry(&hub);

        registry
            .setup(DeviceCategory::Switch, vec![config()])
            .await
            .unwrap();
        let reads_after_first = hub.read_call_count();
        registry
            .setup(DeviceCategory::Switch, vec![config()])
            .await
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(hub.read_call_count(), reads_after_first);
    }
}
