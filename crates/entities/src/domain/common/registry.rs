//! Registry of nested types
//!
//! Maps the type names used in field descriptors to constructors. Entity
//! types register themselves (and, transitively, the types their fields
//! refer to) on first use; other constructible values are registered
//! explicitly or come built in.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::Value;

use super::entity::Entity;
use super::error::EntityError;
use crate::engine::Engine;
use crate::shared::property::{FieldValue, Property};

/// Non-entity type that can be built from a raw input value (e.g. a date/time)
pub trait Constructible: FieldValue + 'static {
    /// Name used by descriptors referencing this type
    const TYPE_NAME: &'static str;

    fn construct(value: &Value) -> anyhow::Result<Self>;
}

type BuildFn = fn(&Engine, &Value) -> Result<Property, EntityError>;

/// What a registered name builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Hydrated recursively, input must be a map
    Entity,
    /// Built by [`Constructible::construct`] from any input value
    Value,
}

/// Registered nested type
#[derive(Clone, Copy)]
pub struct TypeEntry {
    pub name: &'static str,
    pub type_id: TypeId,
    pub kind: TypeKind,
    build: BuildFn,
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl TypeEntry {
    pub fn build(&self, engine: &Engine, value: &Value) -> Result<Property, EntityError> {
        (self.build)(engine, value)
    }
}

fn build_entity<T: Entity>(engine: &Engine, value: &Value) -> Result<Property, EntityError> {
    engine
        .hydrate_value::<T>(value)
        .map(|entity| Property::Entity(Box::new(entity)))
}

fn build_value<T: Constructible>(_engine: &Engine, value: &Value) -> Result<Property, EntityError> {
    T::construct(value)
        .map(|built| built.to_property())
        .map_err(|e| EntityError::InvalidValue {
            type_name: T::TYPE_NAME,
            message: format!("{:#}", e),
        })
}

/// Registry combining entity types and constructible values
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// First registration of each name
    entries: HashMap<&'static str, TypeEntry>,
    /// Every registered Rust type, including ones whose name collided
    by_type: HashMap<TypeId, TypeEntry>,
    /// Rust types already processed, including ones whose name collided
    seen: HashSet<TypeId>,
}

impl TypeRegistry {
    /// Registry with the built-in constructible types
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_value::<chrono::DateTime<chrono::FixedOffset>>();
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an entity type and every type its fields refer to
    pub fn register_entity<T: Entity>(&mut self) {
        if !self.seen.insert(TypeId::of::<T>()) {
            return;
        }

        self.insert(TypeEntry {
            name: T::NAME,
            type_id: TypeId::of::<T>(),
            kind: TypeKind::Entity,
            build: build_entity::<T>,
        });
        T::register_dependencies(self);
    }

    /// Register a constructible value type
    pub fn register_value<T: Constructible>(&mut self) {
        if !self.seen.insert(TypeId::of::<T>()) {
            return;
        }

        self.insert(TypeEntry {
            name: T::TYPE_NAME,
            type_id: TypeId::of::<T>(),
            kind: TypeKind::Value,
            build: build_value::<T>,
        });
    }

    fn insert(&mut self, entry: TypeEntry) {
        self.by_type.insert(entry.type_id, entry);

        if let Some(existing) = self.entries.get(entry.name) {
            tracing::warn!(
                "type name '{}' is already registered ({:?}); the name keeps the first \
                 registration, fields of the other Rust type resolve by type",
                entry.name,
                existing.kind
            );
            return;
        }

        tracing::debug!("registered {:?} type '{}'", entry.kind, entry.name);
        self.entries.insert(entry.name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn get_by_type(&self, type_id: TypeId) -> Option<&TypeEntry> {
        self.by_type.get(&type_id)
    }

    /// Entry for `name`, preferring the one built for `type_id` when it
    /// carries that name
    pub fn resolve(&self, name: &str, type_id: Option<TypeId>) -> Option<&TypeEntry> {
        type_id
            .and_then(|id| self.get_by_type(id))
            .filter(|entry| entry.name == name)
            .or_else(|| self.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether `T` was processed already, even if its name collided
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.seen.contains(&TypeId::of::<T>())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
