/// Declare an entity struct together with its field descriptors
///
/// Every field carries a `#[property(..)]` attribute, placed before any other
/// attribute or doc comment on that field. Accepted keys:
///
/// - `name = "..."`: external key (defaults to the field identifier)
/// - `type = "..."`: `array`, `object`, `int`, `float`, `bool`, `string` or a
///   registered type name (defaults to the Rust type's tag, then `string`)
/// - `is_array`, `required`, `nullable`
///
/// The struct must derive `Debug`, `Clone` and `Default`. `Serialize` and
/// `Deserialize` are implemented by the macro through the global engine.
///
/// The engine passes `array` and `object` values through unchanged, but the
/// Rust field type still has to hold them: `null` only fits an `Option` or a
/// `serde_json::Value`. Declare such fields as `Option<Map<String, Value>>` or
/// `Value` when the input may carry `null`; a plain `Map` rejects it with
/// `TypeMismatch`.
///
/// Entities sharing a name across modules are told apart by their Rust type
/// when a field of that type names them.
///
/// ```rust,ignore
/// entities::entity! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Member {
///         #[property(required)]
///         pub name: String,
///         #[property(name = "realName", required, nullable)]
///         pub real_name: Option<String>,
///         #[property(is_array, required)]
///         pub powers: Vec<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    // Property attribute keys, folded into a const descriptor expression
    (@descriptor $d:expr ;) => { $d };
    (@descriptor $d:expr ; name = $v:literal $(, $($rest:tt)*)?) => {
        $crate::entity!(@descriptor $d.with_name($v) ; $($($rest)*)?)
    };
    (@descriptor $d:expr ; type = $v:literal $(, $($rest:tt)*)?) => {
        $crate::entity!(@descriptor $d.with_type($v) ; $($($rest)*)?)
    };
    (@descriptor $d:expr ; is_array $(, $($rest:tt)*)?) => {
        $crate::entity!(@descriptor $d.array() ; $($($rest)*)?)
    };
    (@descriptor $d:expr ; required $(, $($rest:tt)*)?) => {
        $crate::entity!(@descriptor $d.required() ; $($($rest)*)?)
    };
    (@descriptor $d:expr ; nullable $(, $($rest:tt)*)?) => {
        $crate::entity!(@descriptor $d.nullable() ; $($($rest)*)?)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                #[property($($attr:tt)*)]
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Entity for $name {
            const NAME: &'static str = stringify!($name);

            fn field_descriptors() -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::entity!(@descriptor
                            $crate::FieldDescriptor::new(stringify!($field))
                                .with_declared_type(<$ty as $crate::FieldValue>::DECLARED_TYPE) ;
                            $($attr)*
                        ),
                    )*
                ];
                FIELDS
            }

            #[allow(unused_variables)]
            fn register_dependencies(registry: &mut $crate::TypeRegistry) {
                $( <$ty as $crate::FieldValue>::register_types(registry); )*
            }

            fn field_type_id(name: &str) -> ::std::option::Option<::std::any::TypeId> {
                match name {
                    $(
                        stringify!($field) => <$ty as $crate::FieldValue>::nested_type_id(),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn get_property(
                &self,
                name: &str,
            ) -> ::std::result::Result<$crate::Property, $crate::EntityError> {
                match name {
                    $(
                        stringify!($field) => ::std::result::Result::Ok(
                            $crate::FieldValue::to_property(&self.$field),
                        ),
                    )*
                    _ => ::std::result::Result::Err($crate::EntityError::UnknownProperty {
                        entity: <Self as $crate::Entity>::NAME,
                        property: name.to_string(),
                    }),
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: $crate::Property,
            ) -> ::std::result::Result<&mut Self, $crate::EntityError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::FieldValue>::from_property(value)
                                .map_err(|mismatch| $crate::EntityError::TypeMismatch {
                                    entity: <Self as $crate::Entity>::NAME,
                                    field: name.to_string(),
                                    expected: mismatch.expected,
                                    actual: mismatch.actual,
                                })?;
                        }
                    )*
                    _ => {
                        return ::std::result::Result::Err($crate::EntityError::UnknownProperty {
                            entity: <Self as $crate::Entity>::NAME,
                            property: name.to_string(),
                        });
                    }
                }
                ::std::result::Result::Ok(self)
            }
        }

        impl $crate::FieldValue for $name {
            const DECLARED_TYPE: ::std::option::Option<&'static str> =
                ::std::option::Option::Some(stringify!($name));
            const EXPECTED: &'static str = stringify!($name);

            fn from_property(
                property: $crate::Property,
            ) -> ::std::result::Result<Self, $crate::Mismatch> {
                $crate::entity_from_property::<Self>(property)
            }

            fn to_property(&self) -> $crate::Property {
                $crate::Property::Entity(::std::boxed::Box::new(::std::clone::Clone::clone(self)))
            }

            fn register_types(registry: &mut $crate::TypeRegistry) {
                registry.register_entity::<Self>();
            }

            fn nested_type_id() -> ::std::option::Option<::std::any::TypeId> {
                ::std::option::Option::Some(::std::any::TypeId::of::<Self>())
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                $crate::serde::Serialize::serialize(&$crate::Entity::to_map(self), serializer)
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                let value =
                    <$crate::serde_json::Value as $crate::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::Entity>::from_value(&value)
                    .map_err(<D::Error as $crate::serde::de::Error>::custom)
            }
        }
    };
}
