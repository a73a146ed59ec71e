//! # Serialization Engine: Objects to JSON Mappings
//!
//! [`Engine::serialize`] walks a [`Marshallable`] object using its registered
//! [`TypeDefinition`] and produces a `serde_json::Map`. The mirror operation
//! lives in [`decode`](crate::decode).
//!
//! ## Conversion Rules
//!
//! | Descriptor | Output |
//! |------------|--------|
//! | `int`, `float`, `str`, `bool` | the value's own JSON kind, unchanged |
//! | `date` | `YYYY-MM-DD` |
//! | `datetime` | ISO-8601, offset kept as provided |
//! | enumeration | the member's wire value |
//! | `list[T]` | array, each element per `T` |
//! | registered type | nested mapping |
//!
//! Fields whose `get` returns `None` are omitted. Keys are emitted in
//! declaration order, so serializing the same object twice is
//! byte-identical. A value whose shape disagrees with its primitive
//! descriptor is rendered per its own shape; only malformed descriptors,
//! unregistered names, and undeclared enumeration members are errors.
//!
//! The engine holds nothing but a shared, immutable [`Registry`]; it is
//! `Clone + Send + Sync` and every call is a pure function of its inputs.

use std::sync::Arc;

use lcore_core::error::ROOT_PATH;
use lcore_core::{format_date, MarshalError};
use serde_json::{Map, Number, Value};

use crate::model::Marshallable;
use crate::registry::{Registry, ResolvedType, TypeDefinition};
use crate::value::FieldValue;

/// Converts marshallable objects to and from JSON values.
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) registry: Arc<Registry>,
}

impl Engine {
    /// Create an engine over a frozen registry.
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    /// The registry descriptors are resolved against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Serialize an object into a JSON mapping.
    ///
    /// # Errors
    ///
    /// - `UnknownType` if the object's type or a referenced type is not
    ///   registered.
    /// - `InvalidDescriptor` if a declared descriptor is malformed.
    /// - `UnknownEnumValue` if an enumeration field holds a member the
    ///   enumeration does not declare.
    pub fn serialize(&self, obj: &dyn Marshallable) -> Result<Map<String, Value>, MarshalError> {
        let def = self.registry.type_definition(obj.type_name())?;
        self.serialize_object(obj, def, ROOT_PATH)
    }

    /// Serialize an object and encode it as compact JSON text.
    pub fn to_json(&self, obj: &dyn Marshallable) -> Result<String, MarshalError> {
        Ok(Value::Object(self.serialize(obj)?).to_string())
    }

    fn serialize_object(
        &self,
        obj: &dyn Marshallable,
        def: &TypeDefinition,
        path: &str,
    ) -> Result<Map<String, Value>, MarshalError> {
        tracing::trace!(type_name = def.name(), path, "serializing object");
        let mut out = Map::new();
        for field in def.fields() {
            let Some(value) = obj.get(&field.name) else {
                continue;
            };
            let ty = self.registry.resolve_str(&field.descriptor)?;
            let key = def.wire_key(field);
            let field_path = join_field(path, key);
            out.insert(key.to_string(), self.serialize_value(value, &ty, &field_path)?);
        }
        Ok(out)
    }

    fn serialize_value(
        &self,
        value: FieldValue,
        ty: &ResolvedType<'_>,
        path: &str,
    ) -> Result<Value, MarshalError> {
        match (ty, value) {
            (ResolvedType::List(element), FieldValue::List(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.serialize_value(item, element, &join_index(path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (ResolvedType::Enum(enum_type), FieldValue::Enum(member)) => enum_type
                .wire_value(&member)
                .cloned()
                .ok_or_else(|| MarshalError::UnknownEnumValue {
                    enum_name: enum_type.name().to_string(),
                    value: format!("{member:?}"),
                    path: path.to_string(),
                }),
            (ResolvedType::Object(def), FieldValue::Object(obj)) if obj.type_name() == def.name() => {
                self.serialize_object(obj.as_ref(), def, path).map(Value::Object)
            }
            (_, value) => self.serialize_natural(value, path),
        }
    }

    /// Render a value by its own shape, ignoring the declared descriptor.
    fn serialize_natural(&self, value: FieldValue, path: &str) -> Result<Value, MarshalError> {
        Ok(match value {
            FieldValue::Int(i) => Value::from(i),
            FieldValue::Float(f) => match Number::from_f64(f) {
                Some(n) => Value::Number(n),
                None => {
                    tracing::warn!(path, value = f, "non-finite float has no JSON form, emitting null");
                    Value::Null
                }
            },
            FieldValue::Str(s) => Value::String(s),
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Date(d) => Value::String(format_date(&d)),
            FieldValue::DateTime(dt) => Value::String(dt.to_iso8601()),
            FieldValue::Enum(member) => Value::String(member),
            FieldValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.serialize_natural(item, &join_index(path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)?,
            FieldValue::Object(obj) => {
                let def = self.registry.type_definition(obj.type_name())?;
                Value::Object(self.serialize_object(obj.as_ref(), def, path)?)
            }
        })
    }
}

/// `(root)` + `items` → `items`; `outer` + `items` → `outer.items`.
pub(crate) fn join_field(path: &str, field: &str) -> String {
    if path == ROOT_PATH {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// `items` + 2 → `items[2]`.
pub(crate) fn join_index(path: &str, index: usize) -> String {
    if path == ROOT_PATH {
        format!("[{index}]")
    } else {
        format!("{path}[{index}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EnumType, TypeDefinition};

    #[derive(Debug, Default, Clone)]
    struct Bag {
        values: Vec<(&'static str, f64)>,
    }

    impl Marshallable for Bag {
        fn type_name(&self) -> &'static str {
            "t.Bag"
        }

        fn get(&self, field: &str) -> Option<FieldValue> {
            self.values
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, v)| FieldValue::Float(*v))
        }

        fn set(&mut self, _field: &str, _value: FieldValue) -> Result<(), MarshalError> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Loose {
        pet: Option<&'static str>,
        count: Option<&'static str>,
    }

    impl Marshallable for Loose {
        fn type_name(&self) -> &'static str {
            "t.Loose"
        }

        fn get(&self, field: &str) -> Option<FieldValue> {
            match field {
                "pet" => self.pet.map(|p| FieldValue::Enum(p.to_string())),
                "count" => self.count.map(FieldValue::from),
                _ => None,
            }
        }

        fn set(&mut self, _field: &str, _value: FieldValue) -> Result<(), MarshalError> {
            Ok(())
        }
    }

    fn bag() -> Box<dyn Marshallable> {
        Box::new(Bag::default())
    }

    fn loose() -> Box<dyn Marshallable> {
        Box::new(Loose::default())
    }

    fn engine() -> Engine {
        let mut builder = Registry::builder();
        builder
            .define(
                TypeDefinition::new("t.Bag", bag)
                    .field("a", "float")
                    .field("b", "float")
                    .field("c", "float"),
            )
            .unwrap()
            .define(
                TypeDefinition::new("t.Loose", loose)
                    .field("pet", "t.Pet")
                    .field("count", "int"),
            )
            .unwrap()
            .define_enum(EnumType::new("t.Pet").member("DOG", "woof"))
            .unwrap();
        Engine::new(builder.build())
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let obj = Bag {
            values: vec![("b", 2.5)],
        };
        let out = engine().serialize(&obj).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out["b"], Value::from(2.5));
    }

    #[test]
    fn test_keys_follow_declaration_order() {
        let obj = Bag {
            values: vec![("c", 3.0), ("a", 1.0), ("b", 2.0)],
        };
        let keys: Vec<String> = engine().serialize(&obj).unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        let obj = Bag {
            values: vec![("a", f64::NAN), ("b", f64::INFINITY)],
        };
        let out = engine().serialize(&obj).unwrap();
        assert_eq!(out["a"], Value::Null);
        assert_eq!(out["b"], Value::Null);
    }

    #[test]
    fn test_primitive_mismatch_passes_through() {
        let obj = Loose {
            pet: None,
            count: Some("seven"),
        };
        let out = engine().serialize(&obj).unwrap();
        assert_eq!(out["count"], Value::from("seven"));
    }

    #[test]
    fn test_undeclared_enum_member_fails() {
        let obj = Loose {
            pet: Some("CAT"),
            count: None,
        };
        match engine().serialize(&obj) {
            Err(MarshalError::UnknownEnumValue { enum_name, path, .. }) => {
                assert_eq!(enum_name, "t.Pet");
                assert_eq!(path, "pet");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unregistered_object_type() {
        let engine = Engine::new(Registry::default());
        assert!(matches!(
            engine.serialize(&Bag::default()),
            Err(MarshalError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_to_json_is_compact() {
        let obj = Bag {
            values: vec![("a", 1.5)],
        };
        assert_eq!(engine().to_json(&obj).unwrap(), r#"{"a":1.5}"#);
    }

    #[test]
    fn test_path_joining() {
        assert_eq!(join_field(ROOT_PATH, "a"), "a");
        assert_eq!(join_field("a", "b"), "a.b");
        assert_eq!(join_index(ROOT_PATH, 0), "[0]");
        assert_eq!(join_index("a.b", 3), "a.b[3]");
    }
}
