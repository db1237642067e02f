//! Per-entity discovery configs.

use serde::{Deserialize, Serialize};

use crate::category::DeviceCategory;
use crate::error::ValidationError;

/// Configuration for one discovered entity: a device/channel pair and an
/// optional parameter selecting a single node.
///
/// Produced by the classifier during a discovery cycle and consumed when
/// constructing a device adapter; instances are transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntityConfig {
    /// Category the entity was discovered for.
    pub category: DeviceCategory,
    /// Physical device address.
    pub address: String,
    /// Display name, composed via [`naming::compose_name`](crate::naming::compose_name).
    pub name: String,
    /// Channel within the device, starting at 1.
    #[serde(default = "default_channel")]
    pub channel: u32,
    /// Node selected as the entity's primary parameter, when the category
    /// splits devices per parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

fn default_channel() -> u32 {
    1
}

impl DeviceEntityConfig {
    /// Check the config's basic invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty address or name, or a
    /// channel below 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.channel == 0 {
            return Err(ValidationError::ZeroChannel);
        }
        Ok(())
    }
}
