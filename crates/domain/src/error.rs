//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`BridgeError`] via `#[from]` at the port boundary.

/// Top-level error for the bridge core.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device, entity, or variable does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The hub connection is not established.
    #[error("hub connection is not available")]
    Disconnected,

    /// A remote call to the hub connection failed.
    #[error("hub connection error")]
    Hub(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BridgeError {
    /// Wrap an arbitrary transport error as a hub failure.
    pub fn hub(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Hub(Box::new(err))
    }
}

/// Violations of domain invariants.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device address must not be empty.
    #[error("device address must not be empty")]
    EmptyAddress,

    /// An entity name must not be empty.
    #[error("entity name must not be empty")]
    EmptyName,

    /// Channels are numbered starting at 1.
    #[error("channel must be at least 1")]
    ZeroChannel,

    /// A value could not be coerced to the expected type.
    #[error("cannot coerce {value} to {expected}")]
    Coercion {
        /// Display form of the offending value.
        value: String,
        /// The type the value was expected to coerce to.
        expected: &'static str,
    },
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}
