use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use super::Engine;
use crate::domain::common::Entity;
use crate::shared::property::Property;

impl Engine {
    /// Serialize an entity into a mapping ready for JSON encoding
    ///
    /// Required fields are always written; optional fields only when non-null.
    pub fn serialize<T: Entity>(&self, entity: &T) -> Map<String, Value> {
        let mut fields = Map::new();

        for descriptor in T::field_descriptors() {
            let property = match entity.get_property(descriptor.field) {
                Ok(property) => property,
                Err(e) => {
                    tracing::warn!("Skipping field while serializing {}: {}", T::NAME, e);
                    continue;
                }
            };

            if descriptor.required || !property.is_null() {
                fields.insert(descriptor.key().to_string(), self.property_to_json(property));
            }
        }

        fields
    }

    pub fn serialize_value<T: Entity>(&self, entity: &T) -> Value {
        Value::Object(self.serialize(entity))
    }

    /// Render a property as JSON, serializing nested entities and date/times
    pub fn property_to_json(&self, property: Property) -> Value {
        match property {
            Property::Null => Value::Null,
            Property::Bool(b) => Value::Bool(b),
            Property::Number(n) => Value::Number(n),
            Property::String(s) => Value::String(s),
            Property::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.property_to_json(item))
                    .collect(),
            ),
            Property::Map(map) => Value::Object(map),
            Property::DateTime(dt) => Value::String(self.format_datetime(&dt)),
            Property::Entity(entity) => Value::Object(entity.serialize_with(self)),
        }
    }

    fn format_datetime(&self, dt: &DateTime<FixedOffset>) -> String {
        let format = &self.config.serialization.datetime_format;
        let mut out = String::new();

        if write!(out, "{}", dt.format(format)).is_err() {
            tracing::warn!("Invalid datetime_format '{}', falling back to RFC 3339", format);
            return dt.to_rfc3339();
        }
        out
    }
}
