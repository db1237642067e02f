//! # hmbridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **hub connection port** — the opaque RPC client talking to
//!   the CCU/Homegear controller (`ports::hub::HubConnection`)
//! - Define the **discovery handler port** the orchestrator drives when a
//!   category produced new entities (`ports::platform::DiscoveryHandler`)
//! - Classify remote devices into platform categories and enumerate their
//!   (channel, parameter) pairs (`classifier`)
//! - React to `newDevices` notifications and trigger per-category setup
//!   (`discovery`)
//! - Route raw push callbacks to keypress events or adapter caches
//!   (`router`)
//! - Link entities to remote devices and keep their caches fresh
//!   (`adapter`, `entities`)
//! - Handle the virtual-key and set-variable service calls (`services`)
//! - Provide **in-process infrastructure** (event bus, throttling)
//!
//! ## Dependency rule
//! Depends on `hmbridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod adapter;
pub mod classifier;
pub mod discovery;
pub mod entities;
pub mod event_bus;
pub mod kind;
pub mod ports;
pub mod registry;
pub mod router;
pub mod services;
pub mod throttle;

#[cfg(test)]
pub(crate) mod testing;
