//! Scalar values exchanged with the hub connection.
//!
//! The CCU reports node values and system variables as loosely-typed
//! scalars. Caches store `Option<Value>` where `None` is the "unknown"
//! sentinel used before the first pull.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single scalar value as reported by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Truthiness in the hub's sense: nonzero numbers, `true`, and
    /// non-empty text. Used for the `UNREACH` flag.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric view, when one exists.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Integer code view, used by the status-attribute enumerations.
    #[must_use]
    pub fn as_code(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) | Self::Text(_) => None,
        }
    }

    /// Coerce `incoming` to this value's type.
    ///
    /// System variables carry no schema; the type is inferred from the
    /// last-seen value. Boolean targets accept bools, integers (nonzero is
    /// true) and the usual on/off spellings; every other target is parsed
    /// as a float.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Coercion`] when `incoming` has no
    /// sensible representation in this value's type.
    pub fn coerce_like(&self, incoming: &Value) -> Result<Value, ValidationError> {
        match self {
            Self::Bool(_) => coerce_bool(incoming).map(Value::Bool),
            Self::Int(_) | Self::Float(_) | Self::Text(_) => {
                coerce_float(incoming).map(Value::Float)
            }
        }
    }
}

fn coerce_bool(value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(n) => Ok(*n != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Text(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "enable" => Ok(true),
            "0" | "false" | "no" | "off" | "disable" => Ok(false),
            _ => Err(ValidationError::Coercion {
                value: s.clone(),
                expected: "bool",
            }),
        },
    }
}

fn coerce_float(value: &Value) -> Result<f64, ValidationError> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        Value::Text(s) => s.parse().map_err(|_| ValidationError::Coercion {
            value: s.clone(),
            expected: "float",
        }),
        Value::Bool(b) => Err(ValidationError::Coercion {
            value: b.to_string(),
            expected: "float",
        }),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => b.fmt(f),
            Self::Int(n) => n.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
