//! Common types and traits for all entities

pub mod entity;
pub mod error;
pub mod registry;

// Re-exports
pub use entity::{entity_from_property, DynEntity, Entity};
pub use error::{EntityError, MissingClass};
pub use registry::{Constructible, TypeEntry, TypeKind, TypeRegistry};
