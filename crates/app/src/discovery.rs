//! Discovery orchestrator — reacts to `newDevices` notifications.
//!
//! Every notification is deduplicated to physical device addresses,
//! keypress watches are registered for devices exposing event nodes, and
//! each category is classified independently — a single device can appear
//! in several categories at once.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::broadcast;

use hmbridge_domain::category::DISCOVERY_ORDER;
use hmbridge_domain::device::DeviceDescription;
use hmbridge_domain::entity_config::DeviceEntityConfig;

use crate::classifier::classify;
use crate::ports::hub::{HubConnection, SystemNotification};
use crate::ports::platform::DiscoveryHandler;
use crate::router::EventRouter;

/// Partitions newly announced devices by category and triggers platform
/// setup for each.
pub struct DiscoveryOrchestrator<H, D> {
    hub: Arc<H>,
    router: Arc<EventRouter<H>>,
    handler: D,
}

impl<H: HubConnection, D: DiscoveryHandler> DiscoveryOrchestrator<H, D> {
    #[must_use]
    pub fn new(hub: Arc<H>, router: Arc<EventRouter<H>>, handler: D) -> Self {
        Self {
            hub,
            router,
            handler,
        }
    }

    /// Handle one `newDevices` notification.
    pub async fn handle_new_devices(
        &self,
        interface_id: &str,
        descriptions: &[DeviceDescription],
    ) {
        tracing::debug!(interface_id, count = descriptions.len(), "newDevices");

        // The hub announces every channel; only the physical device matters.
        let seen: BTreeSet<&str> = descriptions
            .iter()
            .map(DeviceDescription::physical_address)
            .collect();
        if seen.is_empty() {
            return;
        }

        let devices = self.hub.devices().await;

        for address in &seen {
            let Some(device) = devices.get(*address) else {
                continue;
            };
            if !device.event_nodes.is_empty() {
                tracing::debug!(address, "watch events");
                self.router.watch_device(address);
            }
        }

        for category in DISCOVERY_ORDER {
            let mut found: Vec<DeviceEntityConfig> = Vec::new();
            for address in &seen {
                if let Some(device) = devices.get(*address) {
                    found.extend(classify(device, category));
                }
            }
            if found.is_empty() {
                continue;
            }
            if let Err(err) = self.handler.setup(category, found).await {
                tracing::error!(%category, error = %err, "platform setup failed");
            }
        }
    }

    /// Consume the hub's system-notification stream until it closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<SystemNotification>) {
        loop {
            match receiver.recv().await {
                Ok(SystemNotification::NewDevices {
                    interface_id,
                    descriptions,
                }) => {
                    self.handle_new_devices(&interface_id, &descriptions).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "system notification stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
