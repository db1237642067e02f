//! Discovery handler port — platform setup for discovered entities.

use std::future::Future;
use std::sync::Arc;

use hmbridge_domain::category::DeviceCategory;
use hmbridge_domain::entity_config::DeviceEntityConfig;
use hmbridge_domain::error::BridgeError;

/// Receives the per-category entity lists the discovery orchestrator
/// produced and performs platform setup for them.
///
/// The bundled [`AdapterRegistry`](crate::registry::AdapterRegistry)
/// implements this by constructing and linking device adapters; a hosting
/// platform can substitute its own handler.
pub trait DiscoveryHandler: Send + Sync {
    /// Set up all entities discovered for `category`.
    fn setup(
        &self,
        category: DeviceCategory,
        entries: Vec<DeviceEntityConfig>,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: DiscoveryHandler> DiscoveryHandler for Arc<T> {
    fn setup(
        &self,
        category: DeviceCategory,
        entries: Vec<DeviceEntityConfig>,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).setup(category, entries)
    }
}
