//! # hmbridge-domain
//!
//! Pure domain model for the hmbridge CCU/Homegear bridge.
//!
//! ## Responsibilities
//! - Describe **remote devices** as the hub connection reports them:
//!   address, device class, element count, and the six metadata node maps
//! - Represent the loosely-typed **channel binding** indicator as a tagged
//!   variant resolved once at classification time
//! - Define the fixed **category tables** (which device classes qualify for
//!   switch/light/sensor/… discovery) and the status-attribute table
//! - Entity naming rules and per-entity discovery configs
//! - Scalar **values** with the coercion rules used for variable writes
//! - Domain events (keypress, state refresh) and error conventions
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod attribute;
pub mod category;
pub mod device;
pub mod entity_config;
pub mod event;
pub mod naming;
pub mod node;
pub mod value;
