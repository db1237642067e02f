//! Device classifier — decides which platform categories a remote device
//! qualifies for and enumerates its (channel, parameter) pairs.

use std::collections::BTreeMap;

use hmbridge_domain::category::DeviceCategory;
use hmbridge_domain::device::RemoteDevice;
use hmbridge_domain::entity_config::DeviceEntityConfig;
use hmbridge_domain::naming::compose_name;
use hmbridge_domain::node::{ChannelBinding, IGNORED_DISCOVERY_NODES};

/// Classify a device for one category.
///
/// Returns one [`DeviceEntityConfig`] per surviving (channel, parameter)
/// pair, or nothing when the device's class is not in the category's
/// table. Entries failing validation are logged and dropped, never fatal.
#[must_use]
pub fn classify(device: &RemoteDevice, category: DeviceCategory) -> Vec<DeviceEntityConfig> {
    if !category.accepts(&device.device_class) {
        return Vec::new();
    }

    let params = build_param_list(device, category);
    if params.is_empty() {
        tracing::debug!(address = %device.address, %category, "no params for device");
        return Vec::new();
    }

    let mut entries = Vec::new();
    for channel in 1..=device.element_count {
        let Some(channel_params) = params.get(&channel) else {
            tracing::debug!(address = %device.address, channel, "channel not in params");
            continue;
        };
        for param in channel_params {
            let config = DeviceEntityConfig {
                category,
                address: device.address.clone(),
                name: compose_name(&device.name, channel, param.as_deref()),
                channel,
                param: param.clone(),
            };
            match config.validate() {
                Ok(()) => entries.push(config),
                Err(err) => {
                    tracing::error!(address = %device.address, error = %err, "invalid device config");
                }
            }
        }
    }

    tracing::debug!(address = %device.address, %category, count = entries.len(), "autodiscovery");
    entries
}

/// Enumerate the eligible parameters per channel.
///
/// Channel-linked nodes appear on every channel; fixed-channel nodes only
/// on channel 1. For non-merging categories an empty channel still yields
/// one `None` entry so the whole channel becomes a single entity; merging
/// categories drop empty channels.
#[must_use]
pub fn build_param_list(
    device: &RemoteDevice,
    category: DeviceCategory,
) -> BTreeMap<u32, Vec<Option<String>>> {
    let merge = category.merges_parameters();

    // Sorted for deterministic discovery output.
    let mut nodes: Vec<(&str, ChannelBinding)> = category
        .discovery_metadata(device)
        .map(|metadata| {
            metadata
                .iter()
                .map(|(node, binding)| (node.as_str(), *binding))
                .collect()
        })
        .unwrap_or_default();
    nodes.sort_unstable_by_key(|(node, _)| *node);

    let mut params = BTreeMap::new();
    for channel in 1..=device.element_count {
        let mut channel_params: Vec<Option<String>> = Vec::new();
        for (node, binding) in &nodes {
            if IGNORED_DISCOVERY_NODES.contains(node) {
                continue;
            }
            // First channel also picks up nodes pinned to other channels.
            if binding.is_channel_linked() || channel == 1 {
                channel_params.push(Some((*node).to_string()));
            }
        }

        if channel_params.is_empty() && !merge {
            channel_params.push(None);
        }
        if !channel_params.is_empty() {
            params.insert(channel, channel_params);
        }
    }
    params
}
