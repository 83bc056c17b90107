//! Entity engine
//!
//! Hydrates entities from JSON-shaped input and serializes them back, driven
//! by each entity's field descriptors. Nested type names are resolved
//! through a [`TypeRegistry`] that fills up lazily as entity types are used.

mod hydrate;
mod serialize;

use std::any::TypeId;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::domain::common::{Constructible, Entity, TypeEntry, TypeRegistry};
use crate::shared::config::EngineConfig;
use crate::shared::metadata::{FieldKind, ScalarType};

/// Coercion strategy resolved from a field's effective type
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    Passthrough,
    Scalar(ScalarType),
    Nested(TypeEntry),
}

pub struct Engine {
    config: EngineConfig,
    registry: RwLock<TypeRegistry>,
}

static GLOBAL: Lazy<Engine> = Lazy::new(Engine::default);

/// Process-wide engine with the default configuration
pub fn global() -> &'static Engine {
    &GLOBAL
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, TypeRegistry::new())
    }

    pub fn with_registry(config: EngineConfig, registry: TypeRegistry) -> Self {
        Self {
            config,
            registry: RwLock::new(registry),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an entity type (and its nested types) ahead of first use
    pub fn register<T: Entity>(&self) {
        self.registry_mut().register_entity::<T>();
    }

    /// Register a constructible non-entity type
    pub fn register_value<T: Constructible>(&self) {
        self.registry_mut().register_value::<T>();
    }

    /// Whether a type name resolves to a registered type
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.registry().contains(type_name)
    }

    pub fn registered_types(&self) -> Vec<&'static str> {
        self.registry().names()
    }

    /// Resolve the coercion strategy for an effective type name
    pub fn resolve(&self, type_name: &'static str) -> Option<Strategy> {
        self.resolve_for(type_name, None)
    }

    /// Like [`Engine::resolve`], preferring the nested type built for the
    /// field's own Rust type when several types share the name
    pub fn resolve_for(&self, type_name: &'static str, type_id: Option<TypeId>) -> Option<Strategy> {
        match FieldKind::classify(type_name) {
            FieldKind::Passthrough => Some(Strategy::Passthrough),
            FieldKind::Scalar(scalar) => Some(Strategy::Scalar(scalar)),
            FieldKind::Nested(name) => self
                .registry()
                .resolve(name, type_id)
                .copied()
                .map(Strategy::Nested),
        }
    }

    pub(crate) fn ensure_registered<T: Entity>(&self) {
        let registered = self.registry().is_registered::<T>();
        if !registered {
            self.register::<T>();
        }
    }

    // The registry only grows, so a poisoned lock still holds usable data
    fn registry(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_builtin_categories() {
        let engine = Engine::default();
        assert!(matches!(engine.resolve("object"), Some(Strategy::Passthrough)));
        assert!(matches!(
            engine.resolve("float"),
            Some(Strategy::Scalar(ScalarType::Float))
        ));
        assert!(matches!(engine.resolve("DateTime"), Some(Strategy::Nested(_))));
        assert!(engine.resolve("Ghost").is_none());
    }

    #[test]
    fn test_empty_registry_has_no_datetime() {
        let engine = Engine::with_registry(EngineConfig::default(), TypeRegistry::empty());
        assert!(!engine.is_registered("DateTime"));
        assert!(engine.resolve("DateTime").is_none());
        assert!(engine.registered_types().is_empty());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(global(), global()));
        assert!(global().config().hydration.reject_unknown_fields);
    }
}
