//! # hmbridged — homematic bridge daemon
//!
//! Composition root that wires the hub connection, discovery, event
//! routing, and entities together and runs the bridge.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Construct the hub connection (the simulated hub stands in for the
//!   XML-RPC transport)
//! - Wire the event bus, router, registry, and discovery orchestrator
//! - Spawn the background tasks and the periodic hub-entity pull loop
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hmbridge_adapter_sim_hub::SimHub;
use hmbridge_app::discovery::DiscoveryOrchestrator;
use hmbridge_app::entities::{HubEntity, VariableEntity};
use hmbridge_app::event_bus::EventBus;
use hmbridge_app::ports::hub::HubConnection;
use hmbridge_app::registry::AdapterRegistry;
use hmbridge_app::router::EventRouter;
use hmbridge_app::services::BridgeServices;
use tracing_subscriber::EnvFilter;

use config::Config;

const HUB_UPDATE_PERIOD: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();
    tracing::info!(remote = %config.remote_addr(), "starting hmbridge");

    // Hub connection
    let hub = Arc::new(SimHub::demo());
    let bus = EventBus::new(256);

    // Variable entities, seeded from the hub when enabled
    let mut variables = HashMap::new();
    if config.hub.variables_enabled {
        for (name, value) in hub.get_all_system_variables().await? {
            let entity = VariableEntity::new(Arc::clone(&hub), bus.clone(), name.clone(), value);
            variables.insert(name, Arc::new(entity));
        }
    }

    // Routing, discovery, services
    let router = Arc::new(EventRouter::new(Arc::clone(&hub), bus.clone()));
    let registry = Arc::new(AdapterRegistry::new(
        Arc::clone(&hub),
        bus.clone(),
        Arc::clone(&router),
        Duration::from_millis(config.hub.link_delay_ms),
    ));
    let orchestrator =
        DiscoveryOrchestrator::new(Arc::clone(&hub), Arc::clone(&router), Arc::clone(&registry));
    let hub_entity = Arc::new(HubEntity::new(
        Arc::clone(&hub),
        variables.clone(),
        config.hub.variables_enabled,
    ));
    let services = BridgeServices::new(Arc::clone(&hub), variables);

    // Background tasks
    tokio::spawn(Arc::clone(&router).run(hub.events()));
    tokio::spawn(orchestrator.run(hub.system_notifications()));
    tokio::spawn({
        let hub_entity = Arc::clone(&hub_entity);
        async move {
            let mut ticker = tokio::time::interval(HUB_UPDATE_PERIOD);
            loop {
                ticker.tick().await;
                hub_entity.update().await;
            }
        }
    });
    tokio::spawn({
        let mut events = bus.subscribe();
        async move {
            while let Ok(event) = events.recv().await {
                tracing::info!(?event, "bridge event");
            }
        }
    });

    // Let the simulated hub announce its fleet, then demonstrate a
    // virtual key press once the adapters had time to link.
    hub.announce_devices();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        services.virtual_key("KEQ0839576", 1, "PRESS_SHORT").await;
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    hub.disconnect();

    Ok(())
}
