//! Hub and system-variable entities.

pub mod hub;
pub mod variable;

pub use hub::HubEntity;
pub use variable::VariableEntity;
