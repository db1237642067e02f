//! The fixed table of known status attributes.
//!
//! Attribute nodes like `LOWBAT` or `CONTROL_MODE` become display
//! attributes on an entity. Some carry an enumeration from raw integer
//! codes to display strings; codes outside the enumeration pass through
//! unchanged.

use crate::value::Value;

/// One entry of the status-attribute table.
#[derive(Debug, Clone, Copy)]
pub struct StatusAttribute {
    /// Node name as the hub reports it.
    pub node: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Enumeration from raw integer codes to display strings.
    pub states: &'static [(i64, &'static str)],
}

/// Every status attribute the bridge knows how to display.
pub const STATUS_ATTRIBUTES: &[StatusAttribute] = &[
    StatusAttribute {
        node: "LOWBAT",
        label: "Battery",
        states: &[(0, "High"), (1, "Low")],
    },
    StatusAttribute {
        node: "ERROR",
        label: "Sabotage",
        states: &[(0, "No"), (1, "Yes")],
    },
    StatusAttribute {
        node: "RSSI_DEVICE",
        label: "RSSI",
        states: &[],
    },
    StatusAttribute {
        node: "VALVE_STATE",
        label: "Valve",
        states: &[],
    },
    StatusAttribute {
        node: "BATTERY_STATE",
        label: "Battery",
        states: &[],
    },
    StatusAttribute {
        node: "CONTROL_MODE",
        label: "Mode",
        states: &[(0, "Auto"), (1, "Manual"), (2, "Away"), (3, "Boost")],
    },
    StatusAttribute {
        node: "POWER",
        label: "Power",
        states: &[],
    },
    StatusAttribute {
        node: "CURRENT",
        label: "Current",
        states: &[],
    },
    StatusAttribute {
        node: "VOLTAGE",
        label: "Voltage",
        states: &[],
    },
    StatusAttribute {
        node: "WORKING",
        label: "Working",
        states: &[(0, "No"), (1, "Yes")],
    },
];

/// Map a node and its raw value to a display label and value.
///
/// Returns `None` for nodes outside the table. Values matching an
/// enumeration code map to the code's text; everything else passes
/// through unchanged.
#[must_use]
pub fn map_status_attribute(node: &str, value: &Value) -> Option<(&'static str, Value)> {
    let entry = STATUS_ATTRIBUTES.iter().find(|attr| attr.node == node)?;
    let display = value
        .as_code()
        .and_then(|code| {
            entry
                .states
                .iter()
                .find(|(state, _)| *state == code)
                .map(|(_, text)| Value::from(*text))
        })
        .unwrap_or_else(|| value.clone());
    Some((entry.label, display))
}
