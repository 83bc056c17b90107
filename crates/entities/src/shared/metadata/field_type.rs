//! Type categories a field descriptor can resolve to

use std::fmt;

/// Scalar tags accepted in a descriptor's `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Float,
    Bool,
    String,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a field's effective type
///
/// `Nested` only names a type; whether that name is known is decided by the
/// type registry at hydration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Passthrough,       // "array", "object"
    Scalar(ScalarType),
    Nested(&'static str),
}

impl FieldKind {
    pub fn classify(type_name: &'static str) -> Self {
        match type_name {
            "array" | "object" => Self::Passthrough,
            other => match ScalarType::from_tag(other) {
                Some(scalar) => Self::Scalar(scalar),
                None => Self::Nested(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(FieldKind::classify("array"), FieldKind::Passthrough);
        assert_eq!(FieldKind::classify("object"), FieldKind::Passthrough);
        assert_eq!(FieldKind::classify("int"), FieldKind::Scalar(ScalarType::Int));
        assert_eq!(FieldKind::classify("string"), FieldKind::Scalar(ScalarType::String));
        assert_eq!(FieldKind::classify("Address"), FieldKind::Nested("Address"));
    }

    #[test]
    fn test_scalar_tags_are_case_sensitive() {
        assert_eq!(ScalarType::from_tag("Int"), None);
        assert_eq!(FieldKind::classify("Bool"), FieldKind::Nested("Bool"));
    }
}
