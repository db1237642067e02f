//! Device kinds — the closed set of concrete entity flavours.
//!
//! Each kind decides which node names populate its adapter's cache and
//! which cache entry acts as the entity's primary value. This replaces an
//! open-ended subclass hierarchy with variant dispatch.

use hmbridge_domain::category::DeviceCategory;

/// Concrete flavour of a device adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Switch,
    Light,
    Cover,
    BinarySensor,
    Sensor,
    Climate,
}

impl DeviceKind {
    /// Additional node names this kind tracks in its cache, beyond the
    /// device's attribute nodes.
    #[must_use]
    pub fn data_nodes(self, param: Option<&str>) -> Vec<String> {
        match self {
            Self::Switch => vec!["STATE".to_string()],
            Self::Light | Self::Cover => vec!["LEVEL".to_string()],
            Self::Climate => vec![
                "SET_TEMPERATURE".to_string(),
                "ACTUAL_TEMPERATURE".to_string(),
                "CONTROL_MODE".to_string(),
            ],
            Self::Sensor => param.map(str::to_string).into_iter().collect(),
            Self::BinarySensor => vec![param.unwrap_or("STATE").to_string()],
        }
    }

    /// The cache entry acting as the entity's primary value when the
    /// discovery config named no parameter.
    #[must_use]
    pub fn default_main_param(self) -> Option<&'static str> {
        match self {
            Self::Switch => Some("STATE"),
            Self::Light | Self::Cover => Some("LEVEL"),
            Self::Climate => Some("SET_TEMPERATURE"),
            Self::BinarySensor => Some("STATE"),
            Self::Sensor => None,
        }
    }
}

impl From<DeviceCategory> for DeviceKind {
    fn from(category: DeviceCategory) -> Self {
        match category {
            DeviceCategory::Switch => Self::Switch,
            DeviceCategory::Light => Self::Light,
            DeviceCategory::Cover => Self::Cover,
            DeviceCategory::BinarySensor => Self::BinarySensor,
            DeviceCategory::Sensor => Self::Sensor,
            DeviceCategory::Climate => Self::Climate,
        }
    }
}
