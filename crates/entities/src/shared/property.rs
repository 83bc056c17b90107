//! Dynamic property values
//!
//! [`Property`] is what flows between the engine and an entity's generic
//! accessor: decoded JSON plus the two things JSON cannot carry, already
//! built nested entities and date/times. [`FieldValue`] converts it to and
//! from concrete Rust field types.

use std::any::TypeId;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Number, Value};

use crate::domain::common::{DynEntity, TypeRegistry};

/// Value of a single entity property
#[derive(Debug, Clone)]
pub enum Property {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Property>),
    /// Passthrough JSON object
    Map(Map<String, Value>),
    DateTime(DateTime<FixedOffset>),
    Entity(Box<dyn DynEntity>),
}

impl Property {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Describe this value as not fitting `expected`
    pub fn mismatch(&self, expected: &'static str) -> Mismatch {
        Mismatch {
            expected,
            actual: self.kind(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(n) => ValueKind::of_number(n),
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Entity(entity) => ValueKind::Entity(entity.entity_name()),
        }
    }

    /// Convert back to plain JSON
    ///
    /// Fails on date/times and entities, which need the engine to be rendered.
    pub fn into_json(self) -> Result<Value, ValueKind> {
        match self {
            Self::Null => Ok(Value::Null),
            Self::Bool(b) => Ok(Value::Bool(b)),
            Self::Number(n) => Ok(Value::Number(n)),
            Self::String(s) => Ok(Value::String(s)),
            Self::Array(items) => items
                .into_iter()
                .map(Property::into_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Self::Map(map) => Ok(Value::Object(map)),
            other => Err(other.kind()),
        }
    }
}

impl From<Value> for Property {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Property::from).collect()),
            Value::Object(map) => Self::Map(map),
        }
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Property {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<DateTime<FixedOffset>> for Property {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}

// ============================================================================
// Runtime kinds (used in diagnostics)
// ============================================================================

/// Runtime kind of a value, as reported in type mismatch errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Map,
    DateTime,
    Entity(&'static str),
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) => Self::of_number(n),
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Map,
        }
    }

    pub fn of_number(number: &Number) -> Self {
        if number.is_f64() {
            Self::Float
        } else {
            Self::Int
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Map => "map",
            Self::DateTime => "DateTime",
            Self::Entity(name) => name,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conversion to Rust field types
// ============================================================================

/// A property that did not fit a Rust field type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: &'static str,
    pub actual: ValueKind,
}

/// Rust type usable as an entity field
///
/// On failure `from_property` reports what it expected and what it got; the
/// caller adds field and entity context.
pub trait FieldValue: Sized {
    /// Type tag used when the descriptor does not declare one
    const DECLARED_TYPE: Option<&'static str> = None;

    /// What this type accepts, for diagnostics
    const EXPECTED: &'static str;

    fn from_property(property: Property) -> Result<Self, Mismatch>;

    fn to_property(&self) -> Property;

    /// Register the nested types this field needs for hydration
    fn register_types(_registry: &mut TypeRegistry) {}

    /// Rust type a nested type name on this field resolves to
    fn nested_type_id() -> Option<TypeId> {
        None
    }
}

impl FieldValue for String {
    const DECLARED_TYPE: Option<&'static str> = Some("string");
    const EXPECTED: &'static str = "string";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::String(s) => Ok(s),
            other => Err(other.mismatch(Self::EXPECTED)),
        }
    }

    fn to_property(&self) -> Property {
        Property::String(self.clone())
    }
}

impl FieldValue for bool {
    const DECLARED_TYPE: Option<&'static str> = Some("bool");
    const EXPECTED: &'static str = "bool";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::Bool(b) => Ok(b),
            other => Err(other.mismatch(Self::EXPECTED)),
        }
    }

    fn to_property(&self) -> Property {
        Property::Bool(*self)
    }
}

fn number_to_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

macro_rules! impl_integer_field {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const DECLARED_TYPE: Option<&'static str> = Some("int");
            const EXPECTED: &'static str = "int";

            fn from_property(property: Property) -> Result<Self, Mismatch> {
                match property {
                    Property::Number(n) => number_to_integer(&n)
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| Mismatch {
                            expected: Self::EXPECTED,
                            actual: ValueKind::of_number(&n),
                        }),
                    other => Err(other.mismatch(Self::EXPECTED)),
                }
            }

            fn to_property(&self) -> Property {
                Property::Number(Number::from(*self))
            }
        }
    )*};
}

impl_integer_field!(i32, i64, u32, u64);

impl FieldValue for f64 {
    const DECLARED_TYPE: Option<&'static str> = Some("float");
    const EXPECTED: &'static str = "float";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::Number(n) => n.as_f64().ok_or_else(|| Mismatch {
                expected: Self::EXPECTED,
                actual: ValueKind::of_number(&n),
            }),
            other => Err(other.mismatch(Self::EXPECTED)),
        }
    }

    fn to_property(&self) -> Property {
        // NaN and infinities have no JSON form
        Number::from_f64(*self)
            .map(Property::Number)
            .unwrap_or(Property::Null)
    }
}

impl FieldValue for f32 {
    const DECLARED_TYPE: Option<&'static str> = Some("float");
    const EXPECTED: &'static str = "float";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        f64::from_property(property).map(|v| v as f32)
    }

    // Widen through the shortest decimal form so 0.1f32 stays 0.1
    fn to_property(&self) -> Property {
        self.to_string()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Property::Number)
            .unwrap_or(Property::Null)
    }
}

impl FieldValue for Value {
    const EXPECTED: &'static str = "json";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        property.into_json().map_err(|actual| Mismatch {
            expected: Self::EXPECTED,
            actual,
        })
    }

    fn to_property(&self) -> Property {
        Property::from(self.clone())
    }
}

impl FieldValue for Map<String, Value> {
    const DECLARED_TYPE: Option<&'static str> = Some("object");
    const EXPECTED: &'static str = "map";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::Map(map) => Ok(map),
            other => Err(other.mismatch(Self::EXPECTED)),
        }
    }

    fn to_property(&self) -> Property {
        Property::Map(self.clone())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const DECLARED_TYPE: Option<&'static str> = T::DECLARED_TYPE;
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::Null => Ok(None),
            other => T::from_property(other).map(Some),
        }
    }

    fn to_property(&self) -> Property {
        match self {
            Some(value) => value.to_property(),
            None => Property::Null,
        }
    }

    fn register_types(registry: &mut TypeRegistry) {
        T::register_types(registry);
    }

    fn nested_type_id() -> Option<TypeId> {
        T::nested_type_id()
    }
}

/// Element type drives the declared type; `is_array` stays explicit
impl<T: FieldValue> FieldValue for Vec<T> {
    const DECLARED_TYPE: Option<&'static str> = T::DECLARED_TYPE;
    const EXPECTED: &'static str = "array";

    fn from_property(property: Property) -> Result<Self, Mismatch> {
        match property {
            Property::Array(items) => items.into_iter().map(T::from_property).collect(),
            other => Err(other.mismatch(Self::EXPECTED)),
        }
    }

    fn to_property(&self) -> Property {
        Property::Array(self.iter().map(FieldValue::to_property).collect())
    }

    fn register_types(registry: &mut TypeRegistry) {
        T::register_types(registry);
    }

    fn nested_type_id() -> Option<TypeId> {
        T::nested_type_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_from_json_keeps_objects_opaque() {
        let property = Property::from(json!({"a": [1, 2]}));
        match property {
            Property::Map(map) => assert_eq!(map["a"], json!([1, 2])),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_value_kind_names() {
        assert_eq!(ValueKind::of(&json!(null)).to_string(), "null");
        assert_eq!(ValueKind::of(&json!(12)).to_string(), "int");
        assert_eq!(ValueKind::of(&json!(1.5)).to_string(), "float");
        assert_eq!(ValueKind::of(&json!({})).to_string(), "map");
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(i64::from_property(Property::from(json!(12))), Ok(12));
        assert_eq!(
            u32::from_property(Property::from(json!(-1))),
            Err(Mismatch { expected: "int", actual: ValueKind::Int })
        );
        assert_eq!(
            i64::from_property(Property::from(json!(1.5))),
            Err(Mismatch { expected: "int", actual: ValueKind::Float })
        );
        assert_eq!(
            i64::from_property(Property::from("12")),
            Err(Mismatch { expected: "int", actual: ValueKind::String })
        );
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(f64::from_property(Property::from(json!(3))), Ok(3.0));
        assert!(f64::NAN.to_property().is_null());
    }

    #[test]
    fn test_f32_keeps_its_decimal_form() {
        let value = f32::from_property(Property::from(json!(0.1))).unwrap();
        assert_eq!(value.to_property().into_json(), Ok(json!(0.1)));
        assert_eq!(2.5f32.to_property().into_json(), Ok(json!(2.5)));
        assert!(f32::INFINITY.to_property().is_null());
    }

    #[test]
    fn test_option_and_vec() {
        assert_eq!(Option::<String>::from_property(Property::Null), Ok(None));
        assert_eq!(
            Vec::<String>::from_property(Property::from(json!(["flight", "laser eyes"]))),
            Ok(vec!["flight".to_string(), "laser eyes".to_string()])
        );
        assert_eq!(
            Vec::<String>::from_property(Property::from(json!(["flight", 3]))),
            Err(Mismatch { expected: "string", actual: ValueKind::Int })
        );
        assert_eq!(
            Vec::<String>::from_property(Property::Null),
            Err(Mismatch { expected: "array", actual: ValueKind::Null })
        );
    }

    #[test]
    fn test_json_round_trip_through_property() {
        let raw = json!({"nested": {"deep": [true, null, "x"]}});
        let back = Value::from_property(raw.to_property()).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_declared_types() {
        assert_eq!(<Option<String> as FieldValue>::DECLARED_TYPE, Some("string"));
        assert_eq!(<Vec<i64> as FieldValue>::DECLARED_TYPE, Some("int"));
        assert_eq!(<Value as FieldValue>::DECLARED_TYPE, None);
        assert_eq!(<Map<String, Value> as FieldValue>::DECLARED_TYPE, Some("object"));
    }
}
