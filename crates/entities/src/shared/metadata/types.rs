//! Field descriptor type
//!
//! Descriptors are 'static compile-time constants, so a whole entity schema
//! is a `&'static [FieldDescriptor]` with no runtime construction cost.

use super::field_type::FieldKind;

/// Type used when neither the descriptor nor the Rust field type declares one
pub const DEFAULT_TYPE: &str = "string";

// ============================================================================
// Field-level metadata
// ============================================================================

/// Contract of a single entity field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field identifier, target of the generic accessor
    pub field: &'static str,
    /// External key in the input/output mapping
    pub name: Option<&'static str>,
    /// Declared type tag or registered type name
    pub type_name: Option<&'static str>,
    /// Type tag derived from the Rust field type
    pub declared_type: Option<&'static str>,
    pub is_array: bool,
    pub required: bool,
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Optional, non-nullable, scalar field keyed by its own identifier
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            name: None,
            type_name: None,
            declared_type: None,
            is_array: false,
            required: false,
            nullable: false,
        }
    }

    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub const fn with_type(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    pub const fn with_declared_type(mut self, declared_type: Option<&'static str>) -> Self {
        self.declared_type = declared_type;
        self
    }

    pub const fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Key looked up in the input and written in the output
    pub fn key(&self) -> &'static str {
        self.name.unwrap_or(self.field)
    }

    /// Declared type, then the Rust field's type tag, then `string`
    pub fn effective_type(&self) -> &'static str {
        self.type_name
            .or(self.declared_type)
            .unwrap_or(DEFAULT_TYPE)
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::classify(self.effective_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::ScalarType;

    const PLAIN: FieldDescriptor = FieldDescriptor::new("addressLine1");
    const RENAMED: FieldDescriptor = FieldDescriptor::new("identifier")
        .with_name("id")
        .with_type("int")
        .required();

    #[test]
    fn test_defaults() {
        assert_eq!(PLAIN.key(), "addressLine1");
        assert_eq!(PLAIN.effective_type(), "string");
        assert!(!PLAIN.is_array);
        assert!(!PLAIN.required);
        assert!(!PLAIN.nullable);
    }

    #[test]
    fn test_explicit_name_and_type() {
        assert_eq!(RENAMED.key(), "id");
        assert_eq!(RENAMED.field, "identifier");
        assert_eq!(RENAMED.kind(), FieldKind::Scalar(ScalarType::Int));
        assert!(RENAMED.required);
    }

    #[test]
    fn test_declared_type_is_a_fallback() {
        let inferred = FieldDescriptor::new("createdAt").with_declared_type(Some("DateTime"));
        assert_eq!(inferred.effective_type(), "DateTime");

        let overridden = inferred.with_type("string");
        assert_eq!(overridden.effective_type(), "string");
    }
}
