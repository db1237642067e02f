//! System-variable entity — a locally mirrored hub variable.

use std::sync::{Arc, Mutex};

use hmbridge_domain::error::BridgeError;
use hmbridge_domain::event::BridgeEvent;
use hmbridge_domain::value::Value;

use crate::event_bus::EventBus;
use crate::ports::hub::HubConnection;

/// Mirrors one `{name, value}` system variable living on the hub.
///
/// The value type (boolean or numeric) is inferred from the last-seen
/// value; the hub exposes no schema for variables.
pub struct VariableEntity<H> {
    hub: Arc<H>,
    bus: EventBus,
    name: String,
    value: Mutex<Value>,
}

impl<H: HubConnection> VariableEntity<H> {
    #[must_use]
    pub fn new(hub: Arc<H>, bus: EventBus, name: impl Into<String>, value: Value) -> Self {
        Self {
            hub,
            bus,
            name: name.into(),
            value: Mutex::new(value),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current locally cached value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.value.lock().unwrap().clone()
    }

    /// Apply a freshly pulled value. Unchanged values no-op; a delta
    /// updates the cache and signals a state refresh.
    pub fn update_from_hub(&self, value: Value) {
        {
            let mut current = self.value.lock().unwrap();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.bus.publish(BridgeEvent::state_changed(&self.name));
    }

    /// Push a new value to the hub.
    ///
    /// The incoming value is coerced to the entity's existing type, then
    /// written remotely, cached locally, and a state refresh signalled.
    ///
    /// # Errors
    ///
    /// Fails without touching local state when the hub connection is
    /// down, the value cannot be coerced, or the remote write fails.
    pub async fn set_on_hub(&self, value: Value) -> Result<(), BridgeError> {
        if !self.hub.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        let coerced = self.value().coerce_like(&value)?;
        self.hub.set_system_variable(&self.name, coerced.clone()).await?;
        *self.value.lock().unwrap() = coerced;
        self.bus.publish(BridgeEvent::state_changed(&self.name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHub;

    fn variable(hub: &Arc<TestHub>, bus: &EventBus, value: Value) -> VariableEntity<TestHub> {
        VariableEntity::new(Arc::clone(hub), bus.clone(), "Presence", value)
    }

    #[tokio::test]
    async fn should_coerce_and_write_bool_variable_once() {
        let hub = Arc::new(TestHub::default());
        let bus = EventBus::new(16);
        let var = variable(&hub, &bus, Value::Bool(false));

        var.set_on_hub(Value::Bool(true)).await.unwrap();

        assert_eq!(var.value(), Value::Bool(true));
        let writes = hub.variable_writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0], ("Presence".to_string(), Value::Bool(true)));
    }

    #[tokio::test]
    async fn should_coerce_text_to_float_for_numeric_variable() {
        let hub = Arc::new(TestHub::default());
        let bus = EventBus::new(16);
        let var = variable(&hub, &bus, Value::Float(21.0));

        var.set_on_hub(Value::from("23.5")).await.unwrap();

        assert_eq!(var.value(), Value::Float(23.5));
    }

    #[tokio::test]
    async fn should_abort_without_state_change_when_disconnected() {
        let hub = Arc::new(TestHub::default());
        hub.set_connected(false);
        let bus = EventBus::new(16);
        let var = variable(&hub, &bus, Value::Bool(false));

        let result = var.set_on_hub(Value::Bool(true)).await;

        assert!(matches!(result, Err(BridgeError::Disconnected)));
        assert_eq!(var.value(), Value::Bool(false));
        assert!(hub.variable_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_abort_without_write_when_coercion_fails() {
        let hub = Arc::new(TestHub::default());
        let bus = EventBus::new(16);
        let var = variable(&hub, &bus, Value::Bool(false));

        let result = var.set_on_hub(Value::from("maybe")).await;

        assert!(matches!(result, Err(BridgeError::Validation(_))));
        assert!(hub.variable_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_signal_refresh_only_on_delta_from_hub() {
        let hub = Arc::new(TestHub::default());
        let bus = EventBus::new(16);
        let var = variable(&hub, &bus, Value::Float(1.0));
        let mut rx = bus.subscribe();

        var.update_from_hub(Value::Float(1.0));
        assert!(rx.try_recv().is_err());

        var.update_from_hub(Value::Float(2.0));
        assert!(rx.try_recv().is_ok());
        assert_eq!(var.value(), Value::Float(2.0));
    }
}
