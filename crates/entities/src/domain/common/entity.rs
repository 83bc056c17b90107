use std::any::{Any, TypeId};
use std::fmt;

use serde_json::{Map, Value};

use super::error::EntityError;
use super::registry::TypeRegistry;
use crate::engine::{global, Engine};
use crate::shared::metadata::FieldDescriptor;
use crate::shared::property::{FieldValue, Mismatch, Property, ValueKind};

/// Typed record hydrated from and serialized to a JSON-shaped mapping
///
/// Implemented by the `entity!` macro. Every declared field is governed by
/// exactly one [`FieldDescriptor`].
pub trait Entity: Default + Clone + fmt::Debug + Send + Sync + 'static {
    /// Name used by descriptors referencing this type (e.g. `type = "Address"`)
    const NAME: &'static str;

    // ============================================================================
    // Type metadata (static data)
    // ============================================================================

    /// Descriptors of all fields, in declaration order
    fn field_descriptors() -> &'static [FieldDescriptor];

    /// Register the nested types the fields of this entity refer to
    fn register_dependencies(_registry: &mut TypeRegistry) {}

    /// Rust type behind a field's nested type name, by field identifier
    fn field_type_id(_name: &str) -> Option<TypeId> {
        None
    }

    // ============================================================================
    // Generic accessor
    // ============================================================================

    /// Read a field by its Rust identifier
    fn get_property(&self, name: &str) -> Result<Property, EntityError>;

    /// Write a field by its Rust identifier
    ///
    /// Fails with `TypeMismatch` when the value does not fit the field's Rust type.
    fn set_property(&mut self, name: &str, value: Property) -> Result<&mut Self, EntityError>;

    // ============================================================================
    // Provided methods
    // ============================================================================

    fn field_descriptor(name: &str) -> Option<&'static FieldDescriptor> {
        Self::field_descriptors().iter().find(|d| d.field == name)
    }

    /// Typed read through the generic accessor
    fn get<V: FieldValue>(&self, name: &str) -> Result<V, EntityError> {
        let property = self.get_property(name)?;
        V::from_property(property).map_err(|mismatch| EntityError::TypeMismatch {
            entity: Self::NAME,
            field: name.to_string(),
            expected: mismatch.expected,
            actual: mismatch.actual,
        })
    }

    /// Typed write through the generic accessor
    fn set<V: FieldValue>(&mut self, name: &str, value: V) -> Result<&mut Self, EntityError> {
        self.set_property(name, value.to_property())
    }

    /// Hydrate with the process-wide engine
    fn from_value(value: &Value) -> Result<Self, EntityError> {
        global().hydrate_value(value)
    }

    fn from_map(input: &Map<String, Value>) -> Result<Self, EntityError> {
        global().hydrate(input)
    }

    /// Serialize with the process-wide engine
    fn to_map(&self) -> Map<String, Value> {
        global().serialize(self)
    }

    fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

/// Object-safe view of an entity, carried inside [`Property::Entity`]
pub trait DynEntity: Any + fmt::Debug + Send + Sync {
    fn entity_name(&self) -> &'static str;

    fn serialize_with(&self, engine: &Engine) -> Map<String, Value>;

    fn clone_box(&self) -> Box<dyn DynEntity>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Entity> DynEntity for T {
    fn entity_name(&self) -> &'static str {
        T::NAME
    }

    fn serialize_with(&self, engine: &Engine) -> Map<String, Value> {
        engine.serialize(self)
    }

    fn clone_box(&self) -> Box<dyn DynEntity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Clone for Box<dyn DynEntity> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// Unwrap a [`Property::Entity`] holding a `T`
pub fn entity_from_property<T: Entity>(property: Property) -> Result<T, Mismatch> {
    match property {
        Property::Entity(entity) => {
            let mismatch = Mismatch {
                expected: T::NAME,
                actual: ValueKind::Entity(entity.entity_name()),
            };
            entity
                .into_any()
                .downcast::<T>()
                .map(|boxed| *boxed)
                .map_err(|_| mismatch)
        }
        other => Err(other.mismatch(T::NAME)),
    }
}
