//! Declarative hydration and serialization of typed entities
//!
//! Entities are plain structs declared with the [`entity!`] macro. Each field
//! carries a [`FieldDescriptor`] (external name, type, array/required/nullable
//! flags); the [`Engine`] walks those descriptors to build an entity from
//! untyped JSON-shaped input and to serialize it back.
//!
//! Architecture:
//!   shared/   → field metadata, dynamic property values, configuration
//!   domain/   → the `Entity` trait, type registry, errors
//!   engine/   → hydration and serialization algorithms

pub mod domain;
pub mod engine;
pub mod shared;

mod macros;

pub use domain::common::{
    entity_from_property, Constructible, DynEntity, Entity, EntityError, MissingClass, TypeEntry,
    TypeKind, TypeRegistry,
};
pub use engine::{global, Engine, Strategy};
pub use shared::config::{load_config, EngineConfig, HydrationConfig, SerializationConfig};
pub use shared::datetime::ATOM_FORMAT;
pub use shared::metadata::{FieldDescriptor, FieldKind, ScalarType};
pub use shared::property::{FieldValue, Mismatch, Property, ValueKind};

// Used by the `entity!` macro expansion
#[doc(hidden)]
pub use serde;
#[doc(hidden)]
pub use serde_json;
