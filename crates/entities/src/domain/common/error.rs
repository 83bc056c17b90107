use std::fmt;

use thiserror::Error;

use crate::shared::property::ValueKind;

/// A declared field whose type resolved to nothing known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingClass {
    pub type_name: &'static str,
    pub field: &'static str,
}

impl fmt::Display for MissingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing class {} for field {}", self.type_name, self.field)
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Errors raised while hydrating or accessing an entity
#[derive(Debug, Error)]
pub enum EntityError {
    #[error(
        "Some classes are missing while building entity of type {entity}: {}",
        join(.missing, ", ")
    )]
    UnresolvableType {
        entity: &'static str,
        missing: Vec<MissingClass>,
    },

    #[error(
        "Invalid value for field {field}: type {actual} instead of {expected} while building entity of type {entity}"
    )]
    TypeMismatch {
        entity: &'static str,
        field: String,
        expected: &'static str,
        actual: ValueKind,
    },

    #[error("Missing fields while building entity of type {entity}: {}", .fields.join(", "))]
    MissingRequiredField {
        entity: &'static str,
        fields: Vec<String>,
    },

    #[error("Non existing fields while building entity of type {entity}: {}", .fields.join(", "))]
    UnexpectedField {
        entity: &'static str,
        fields: Vec<String>,
    },

    #[error(
        "Unable to build field {field} of type {type_name} while building entity of type {entity}: {source}"
    )]
    NestedConstructionFailure {
        entity: &'static str,
        field: String,
        type_name: &'static str,
        #[source]
        source: Box<EntityError>,
    },

    #[error("Invalid fields while building entity of type {entity}: {}", join(.errors, "; "))]
    InvalidFields {
        entity: &'static str,
        errors: Vec<EntityError>,
    },

    #[error("Invalid value for type {type_name}: {message}")]
    InvalidValue {
        type_name: &'static str,
        message: String,
    },

    #[error("Expected a map to build entity of type {entity}, got {actual}")]
    InvalidInput {
        entity: &'static str,
        actual: ValueKind,
    },

    #[error("Unknown property {property} on entity of type {entity}")]
    UnknownProperty {
        entity: &'static str,
        property: String,
    },
}

impl EntityError {
    /// Entity type the error was raised for, when there is one
    pub fn entity(&self) -> Option<&'static str> {
        match self {
            Self::UnresolvableType { entity, .. }
            | Self::TypeMismatch { entity, .. }
            | Self::MissingRequiredField { entity, .. }
            | Self::UnexpectedField { entity, .. }
            | Self::NestedConstructionFailure { entity, .. }
            | Self::InvalidFields { entity, .. }
            | Self::InvalidInput { entity, .. }
            | Self::UnknownProperty { entity, .. } => Some(*entity),
            Self::InvalidValue { .. } => None,
        }
    }

    /// Collapse the field-level errors of one hydration call
    pub(crate) fn from_field_errors(entity: &'static str, mut errors: Vec<EntityError>) -> Self {
        if errors.len() == 1 {
            if let Some(error) = errors.pop() {
                return error;
            }
        }
        Self::InvalidFields { entity, errors }
    }
}
