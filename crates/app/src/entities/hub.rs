//! Hub entity — overall hub health and the variable pull loop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hmbridge_domain::value::Value;

use crate::entities::variable::VariableEntity;
use crate::ports::hub::HubConnection;
use crate::throttle::Throttle;

/// Minimum interval between hub health pulls.
pub const HUB_STATE_INTERVAL: Duration = Duration::from_secs(300);
/// Minimum interval between system-variable pulls.
pub const VARIABLE_STATE_INTERVAL: Duration = Duration::from_secs(60);

/// Represents the hub itself: its state is the pending service-message
/// count, `None` while unknown.
///
/// Pull-only, throttled independently per pull. Failed remote calls
/// degrade the state to unknown instead of propagating.
pub struct HubEntity<H> {
    hub: Arc<H>,
    use_variables: bool,
    variables: HashMap<String, Arc<VariableEntity<H>>>,
    state: Mutex<Option<usize>>,
    hub_throttle: Mutex<Throttle>,
    var_throttle: Mutex<Throttle>,
}

impl<H: HubConnection> HubEntity<H> {
    /// Create the hub entity with the default pull intervals.
    #[must_use]
    pub fn new(
        hub: Arc<H>,
        variables: HashMap<String, Arc<VariableEntity<H>>>,
        use_variables: bool,
    ) -> Self {
        Self::with_intervals(
            hub,
            variables,
            use_variables,
            HUB_STATE_INTERVAL,
            VARIABLE_STATE_INTERVAL,
        )
    }

    /// Create the hub entity with explicit pull intervals.
    #[must_use]
    pub fn with_intervals(
        hub: Arc<H>,
        variables: HashMap<String, Arc<VariableEntity<H>>>,
        use_variables: bool,
        hub_interval: Duration,
        variable_interval: Duration,
    ) -> Self {
        Self {
            hub,
            use_variables,
            variables,
            state: Mutex::new(None),
            hub_throttle: Mutex::new(Throttle::new(hub_interval)),
            var_throttle: Mutex::new(Throttle::new(variable_interval)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        "Homematic"
    }

    /// Pending service-message count; `None` while unknown.
    #[must_use]
    pub fn state(&self) -> Option<usize> {
        *self.state.lock().unwrap()
    }

    /// The hub entity is available iff the connection is up.
    #[must_use]
    pub fn available(&self) -> bool {
        self.hub.is_connected()
    }

    /// Run both throttled pulls.
    pub async fn update(&self) {
        self.update_hub_state().await;
        self.update_variables_state().await;
    }

    async fn update_hub_state(&self) {
        if !self.hub_throttle.lock().unwrap().acquire() {
            return;
        }
        match self.hub.get_service_messages().await {
            Ok(messages) => {
                *self.state.lock().unwrap() = Some(messages.len());
            }
            Err(err) => {
                tracing::warn!(error = %err, "service message pull failed");
                *self.state.lock().unwrap() = None;
            }
        }
    }

    async fn update_variables_state(&self) {
        if !self.use_variables {
            return;
        }
        if !self.var_throttle.lock().unwrap().acquire() {
            return;
        }
        match self.hub.get_all_system_variables().await {
            Ok(variables) => {
                for (name, value) in variables {
                    if let Some(entity) = self.variables.get(&name) {
                        entity.update_from_hub(value);
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "variable pull failed");
            }
        }
    }
}
