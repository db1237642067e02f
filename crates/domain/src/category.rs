//! Device categories and the fixed class-membership tables.

use serde::{Deserialize, Serialize};

use crate::device::RemoteDevice;
use crate::node::NodeMap;

/// Platform category a discovered entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Switch,
    Light,
    Cover,
    BinarySensor,
    Sensor,
    Climate,
}

/// The order discovery runs the categories in. A device can qualify for
/// several categories at once (e.g. a combined switch and power meter).
pub const DISCOVERY_ORDER: [DeviceCategory; 6] = [
    DeviceCategory::Switch,
    DeviceCategory::Light,
    DeviceCategory::Cover,
    DeviceCategory::BinarySensor,
    DeviceCategory::Sensor,
    DeviceCategory::Climate,
];

impl DeviceCategory {
    /// Device classes that qualify for this category.
    #[must_use]
    pub fn accepted_classes(self) -> &'static [&'static str] {
        match self {
            Self::Switch => &["Switch", "SwitchPowermeter"],
            Self::Light => &["Dimmer"],
            Self::Cover => &["Blind"],
            Self::BinarySensor => &[
                "ShutterContact",
                "Smoke",
                "SmokeV2",
                "Motion",
                "MotionV2",
                "RemoteMotion",
                "WeatherSensor",
                "TiltSensor",
            ],
            Self::Sensor => &[
                "SwitchPowermeter",
                "Motion",
                "MotionV2",
                "RemoteMotion",
                "ThermostatWall",
                "AreaThermostat",
                "RotaryHandleSensor",
                "WaterSensor",
                "PowermeterGas",
                "LuxSensor",
                "WeatherSensor",
                "WeatherStation",
            ],
            Self::Climate => &["Thermostat", "ThermostatWall", "MAXThermostat"],
        }
    }

    /// Whether `class_name` qualifies for this category.
    #[must_use]
    pub fn accepts(self, class_name: &str) -> bool {
        self.accepted_classes().contains(&class_name)
    }

    /// Whether empty channels are dropped instead of producing one
    /// parameterless entity. True for the categories that split a device
    /// into one entity per parameter.
    #[must_use]
    pub fn merges_parameters(self) -> bool {
        matches!(self, Self::Sensor | Self::BinarySensor)
    }

    /// The metadata map parameter enumeration draws from, when any.
    #[must_use]
    pub fn discovery_metadata(self, device: &RemoteDevice) -> Option<&NodeMap> {
        match self {
            Self::Sensor => Some(&device.sensor_nodes),
            Self::BinarySensor => Some(&device.binary_nodes),
            Self::Switch | Self::Light | Self::Cover | Self::Climate => None,
        }
    }
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Switch => "switch",
            Self::Light => "light",
            Self::Cover => "cover",
            Self::BinarySensor => "binary_sensor",
            Self::Sensor => "sensor",
            Self::Climate => "climate",
        };
        f.write_str(name)
    }
}
