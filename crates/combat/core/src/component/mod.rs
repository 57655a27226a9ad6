//! Component model: definitions, instances, behaviors and the library that
//! registers them.
//!
//! A component is a small unit of gameplay logic attached to a skill or item.
//! The split mirrors data vs. behavior:
//!
//! - [`ComponentDefinition`]: immutable id, tag, configuration shape, default
//! - [`ComponentBehavior`]: stateless hook and query implementations
//! - [`ComponentInstance`]: one attachment, owning its value and transient state
//! - [`ComponentLibrary`]: the registration table hosts attach from

mod behavior;
mod definition;
mod instance;
mod library;
mod tag;
mod value;

pub use behavior::{Capability, ComponentBehavior};
pub use definition::{ComponentDefinition, ComponentId};
pub use instance::ComponentInstance;
pub use library::{ComponentLibrary, LibraryEntry};
pub use tag::ComponentTag;
pub use value::{ComponentValue, ConfigShape, DataValue, InstanceState};
