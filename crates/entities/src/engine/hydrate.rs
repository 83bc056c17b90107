use serde_json::{Map, Value};

use super::{Engine, Strategy};
use crate::domain::common::{Entity, EntityError, MissingClass, TypeKind};
use crate::shared::metadata::FieldDescriptor;
use crate::shared::property::{Property, ValueKind};

/// Field being coerced, for error context
struct FieldContext<'a> {
    entity: &'static str,
    descriptor: &'a FieldDescriptor,
}

impl Engine {
    /// Hydrate `T` from any JSON value; only objects are accepted
    pub fn hydrate_value<T: Entity>(&self, input: &Value) -> Result<T, EntityError> {
        match input {
            Value::Object(map) => self.hydrate(map),
            other => Err(EntityError::InvalidInput {
                entity: T::NAME,
                actual: ValueKind::of(other),
            }),
        }
    }

    /// Hydrate `T` from an input mapping
    ///
    /// Every field is processed before failing, so the error lists all
    /// problems of the highest-priority category: unresolvable types, then
    /// invalid values, then unknown keys, then missing required keys.
    pub fn hydrate<T: Entity>(&self, input: &Map<String, Value>) -> Result<T, EntityError> {
        self.ensure_registered::<T>();
        tracing::debug!("Hydrating entity {} from {} input keys", T::NAME, input.len());

        let result = self.hydrate_fields::<T>(input);
        match &result {
            Ok(_) => tracing::debug!("Entity {} hydrated", T::NAME),
            Err(e) => tracing::debug!("Hydration of entity {} failed: {}", T::NAME, e),
        }
        result
    }

    fn hydrate_fields<T: Entity>(&self, input: &Map<String, Value>) -> Result<T, EntityError> {
        let mut instance = T::default();
        let mut remaining: Vec<&str> = input.keys().map(String::as_str).collect();
        let mut missing_fields = Vec::new();
        let mut missing_classes = Vec::new();
        let mut invalid = Vec::new();

        for descriptor in T::field_descriptors() {
            let key = descriptor.key();

            let Some(value) = input.get(key) else {
                if descriptor.required {
                    missing_fields.push(key.to_string());
                }
                continue;
            };
            remaining.retain(|k| *k != key);

            let type_name = descriptor.effective_type();
            let Some(strategy) = self.resolve_for(type_name, T::field_type_id(descriptor.field))
            else {
                missing_classes.push(MissingClass {
                    type_name,
                    field: descriptor.field,
                });
                continue;
            };
            tracing::trace!("{}.{}: {} as {:?}", T::NAME, descriptor.field, type_name, strategy);

            let field = FieldContext {
                entity: T::NAME,
                descriptor,
            };
            match self.coerce(&field, strategy, value) {
                Ok(property) => {
                    if let Err(e) = instance.set_property(descriptor.field, property) {
                        invalid.push(e);
                    }
                }
                Err(errors) => invalid.extend(errors),
            }
        }

        if !missing_classes.is_empty() {
            return Err(EntityError::UnresolvableType {
                entity: T::NAME,
                missing: missing_classes,
            });
        }

        if !invalid.is_empty() {
            return Err(EntityError::from_field_errors(T::NAME, invalid));
        }

        if !remaining.is_empty() && self.config.hydration.reject_unknown_fields {
            return Err(EntityError::UnexpectedField {
                entity: T::NAME,
                fields: remaining.into_iter().map(str::to_string).collect(),
            });
        }

        if !missing_fields.is_empty() {
            return Err(EntityError::MissingRequiredField {
                entity: T::NAME,
                fields: missing_fields,
            });
        }

        Ok(instance)
    }

    /// Apply the strategy to a field value, element-wise for array fields
    fn coerce(
        &self,
        field: &FieldContext<'_>,
        strategy: Strategy,
        value: &Value,
    ) -> Result<Property, Vec<EntityError>> {
        let key = field.descriptor.key();

        if !field.descriptor.is_array {
            return self
                .coerce_one(field, strategy, key.to_string(), value)
                .map_err(|e| vec![e]);
        }

        match value {
            Value::Null if field.descriptor.nullable => Ok(Property::Null),
            Value::Array(items) => {
                let mut elements = Vec::with_capacity(items.len());
                let mut errors = Vec::new();

                for (index, item) in items.iter().enumerate() {
                    match self.coerce_one(field, strategy, format!("{}[{}]", key, index), item) {
                        Ok(property) => elements.push(property),
                        Err(e) => errors.push(e),
                    }
                }

                if errors.is_empty() {
                    Ok(Property::Array(elements))
                } else {
                    Err(errors)
                }
            }
            other => Err(vec![EntityError::TypeMismatch {
                entity: field.entity,
                field: key.to_string(),
                expected: "array",
                actual: ValueKind::of(other),
            }]),
        }
    }

    fn coerce_one(
        &self,
        field: &FieldContext<'_>,
        strategy: Strategy,
        name: String,
        value: &Value,
    ) -> Result<Property, EntityError> {
        let nullable = field.descriptor.nullable;

        match strategy {
            Strategy::Passthrough => Ok(Property::from(value.clone())),

            // The tag is advisory: any scalar passes unchanged
            Strategy::Scalar(scalar) => match value {
                Value::Null if nullable => Ok(Property::Null),
                Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    Ok(Property::from(value.clone()))
                }
                other => Err(EntityError::TypeMismatch {
                    entity: field.entity,
                    field: name,
                    expected: scalar.as_str(),
                    actual: ValueKind::of(other),
                }),
            },

            Strategy::Nested(entry) => {
                if value.is_null() && nullable {
                    return Ok(Property::Null);
                }

                if entry.kind == TypeKind::Entity && !value.is_object() {
                    let source = EntityError::TypeMismatch {
                        entity: field.entity,
                        field: name.clone(),
                        expected: "map",
                        actual: ValueKind::of(value),
                    };
                    return Err(EntityError::NestedConstructionFailure {
                        entity: field.entity,
                        field: name,
                        type_name: entry.name,
                        source: Box::new(source),
                    });
                }

                entry
                    .build(self, value)
                    .map_err(|source| EntityError::NestedConstructionFailure {
                        entity: field.entity,
                        field: name,
                        type_name: entry.name,
                        source: Box::new(source),
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::EngineConfig;
    use serde_json::json;

    crate::entity! {
        #[derive(Debug, Clone, Default)]
        struct Point {
            #[property(type = "int", required)]
            x: i64,
            #[property(type = "int", required)]
            y: i64,
            #[property(nullable)]
            label: Option<String>,
        }
    }

    crate::entity! {
        #[derive(Debug, Clone, Default)]
        struct Path {
            #[property(type = "Point", is_array, nullable)]
            points: Option<Vec<Point>>,
        }
    }

    fn object(value: serde_json::Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_hydrate_point() {
        let engine = Engine::default();
        let point: Point = engine.hydrate(&object(json!({"x": 1, "y": -2}))).unwrap();
        assert_eq!((point.x, point.y), (1, -2));
        assert_eq!(point.label, None);
    }

    #[test]
    fn test_hydrate_registers_nested_types() {
        let engine = Engine::default();
        let path: Path = engine
            .hydrate(&object(json!({"points": [{"x": 0, "y": 0}, {"x": 3, "y": 4, "label": "end"}]})))
            .unwrap();

        let points = path.points.unwrap_or_default();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].label.as_deref(), Some("end"));
        assert!(engine.is_registered("Point"));
        assert!(engine.is_registered("Path"));
    }

    #[test]
    fn test_nullable_array_accepts_null() {
        let engine = Engine::default();
        let path: Path = engine.hydrate(&object(json!({"points": null}))).unwrap();
        assert!(path.points.is_none());
    }

    #[test]
    fn test_error_priority() {
        let engine = Engine::default();

        // Invalid value beats unknown and missing keys
        let err = engine
            .hydrate::<Point>(&object(json!({"x": [1], "z": 3})))
            .unwrap_err();
        assert!(matches!(err, EntityError::TypeMismatch { .. }));

        let err = engine.hydrate::<Point>(&object(json!({"x": 1, "z": 3}))).unwrap_err();
        assert!(matches!(err, EntityError::UnexpectedField { .. }));

        let err = engine.hydrate::<Point>(&object(json!({"x": 1}))).unwrap_err();
        assert!(matches!(err, EntityError::MissingRequiredField { .. }));
    }

    #[test]
    fn test_lenient_engine_ignores_unknown_keys() {
        let mut config = EngineConfig::default();
        config.hydration.reject_unknown_fields = false;
        let engine = Engine::new(config);

        let point: Point = engine
            .hydrate(&object(json!({"x": 1, "y": 2, "z": 3})))
            .unwrap();
        assert_eq!(point.y, 2);
    }
}
