//! Field metadata for declared entities
//!
//! Every entity type exposes a static slice of [`FieldDescriptor`]s built at
//! compile time by the `entity!` macro. The engine reads them to drive both
//! hydration and serialization.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entities::{Entity, FieldKind};
//!
//! for field in Team::field_descriptors() {
//!     println!("{} -> {:?}", field.key(), FieldKind::classify(field.effective_type()));
//! }
//! ```

mod field_type;
mod types;

pub use field_type::{FieldKind, ScalarType};
pub use types::FieldDescriptor;
