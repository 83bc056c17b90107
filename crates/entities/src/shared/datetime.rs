use std::any::TypeId;

use anyhow::{anyhow, Context};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use super::property::{FieldValue, Mismatch, Property, ValueKind};
use crate::domain::common::{Constructible, TypeRegistry};

/// ISO-8601 with explicit offset, e.g. `1960-03-01T20:12:23-04:00`
pub const ATOM_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

impl FieldValue for DateTime<FixedOffset> {
    const DECLARED_TYPE: Option<&'static str> = Some("DateTime");
    const EXPECTED: &'static str = "DateTime";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::DateTime(dt) => Ok(dt),
            other => Err(other.mismatch(Self::EXPECTED)),
        }
    }

    fn to_property(&self) -> Property {
        Property::DateTime(*self)
    }

    fn register_types(registry: &mut TypeRegistry) {
        registry.register_value::<Self>();
    }

    fn nested_type_id() -> Option<TypeId> {
        Some(TypeId::of::<Self>())
    }
}

impl Constructible for DateTime<FixedOffset> {
    const TYPE_NAME: &'static str = "DateTime";

    fn construct(value: &Value) -> anyhow::Result<Self> {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("expected an ISO-8601 string, got {}", ValueKind::of(value)))?;

        DateTime::parse_from_rfc3339(text).with_context(|| format!("invalid date/time '{}'", text))
    }
}
