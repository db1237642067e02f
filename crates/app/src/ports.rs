//! Port definitions — traits the surrounding system implements.
//!
//! Ports are the boundaries between the bridge core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and
//! the adapter layer can depend on them without creating circular
//! dependencies.

pub mod hub;
pub mod platform;

pub use hub::{HubConnection, HubEvent, ServiceMessage, SystemNotification};
pub use platform::DiscoveryHandler;
