//! # Deserialization: JSON Mappings to Objects
//!
//! The mirror of [`Engine::serialize`]: decode JSON text, then populate a
//! default-constructed instance field by field from its registered
//! definition.
//!
//! ## Coercion Rules
//!
//! - `int` accepts JSON integers, and floats with no fractional part that
//!   fit in `i64`. Fractional numbers are rejected.
//! - `float` accepts any JSON number.
//! - `str`, `bool` require the matching JSON kind.
//! - `date`, `datetime` require an ISO-8601 string.
//! - an enumeration requires a value equal to one member's wire value.
//! - `list[T]` requires an array; a registered type requires an object.
//!
//! Missing keys and explicit `null`s leave the field at its default. Keys
//! the definition does not declare are ignored. The first failure aborts the
//! whole call.

use lcore_core::error::ROOT_PATH;
use lcore_core::{parse_date, DateTimeValue, MarshalError, PrimitiveKind};
use serde_json::{Map, Number, Value};

use crate::engine::{join_field, join_index, Engine};
use crate::model::{Marshallable, TypeSchema};
use crate::registry::{ResolvedType, TypeDefinition};
use crate::value::FieldValue;

/// JSON kind of a decoded value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Engine {
    /// Decode JSON text into a new `T`.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` if `json` is not valid JSON.
    /// - `SchemaMismatch` if the top-level value is not an object, or a
    ///   nested value has the wrong shape.
    /// - `TypeCoercion`, `UnknownEnumValue` for values that do not fit their
    ///   declared kind.
    /// - `UnknownType`, `InvalidDescriptor` for registry defects.
    pub fn deserialize<T: TypeSchema>(&self, json: &str) -> Result<T, MarshalError> {
        let value: Value = serde_json::from_str(json).map_err(MarshalError::MalformedInput)?;
        self.deserialize_value(&value)
    }

    /// Populate a new `T` from an already decoded JSON value.
    pub fn deserialize_value<T: TypeSchema>(&self, value: &Value) -> Result<T, MarshalError> {
        let def = self.registry.type_definition(T::NAME)?;
        let map = expect_object(value, ROOT_PATH)?;
        let mut target = T::default();
        self.populate(&mut target, def, map, ROOT_PATH)?;
        Ok(target)
    }

    /// Populate a new instance of the type registered as `type_name`.
    pub fn deserialize_dyn(
        &self,
        value: &Value,
        type_name: &str,
    ) -> Result<Box<dyn Marshallable>, MarshalError> {
        let def = self.registry.type_definition(type_name)?;
        let map = expect_object(value, ROOT_PATH)?;
        self.build_object(def, map, ROOT_PATH)
    }

    fn build_object(
        &self,
        def: &TypeDefinition,
        map: &Map<String, Value>,
        path: &str,
    ) -> Result<Box<dyn Marshallable>, MarshalError> {
        let mut target = def.instantiate();
        self.populate(target.as_mut(), def, map, path)?;
        Ok(target)
    }

    fn populate(
        &self,
        target: &mut dyn Marshallable,
        def: &TypeDefinition,
        map: &Map<String, Value>,
        path: &str,
    ) -> Result<(), MarshalError> {
        tracing::trace!(type_name = def.name(), path, "populating object");
        for field in def.fields() {
            let key = def.wire_key(field);
            let raw = match map.get(key) {
                None | Some(Value::Null) => continue,
                Some(raw) => raw,
            };
            let ty = self.registry.resolve_str(&field.descriptor)?;
            let field_path = join_field(path, key);
            let value = self.decode_value(raw, &ty, &field_path)?;
            target
                .set(&field.name, value)
                .map_err(|e| e.relative_to(&field_path))?;
        }
        Ok(())
    }

    fn decode_value(
        &self,
        raw: &Value,
        ty: &ResolvedType<'_>,
        path: &str,
    ) -> Result<FieldValue, MarshalError> {
        match ty {
            ResolvedType::Primitive(kind) => decode_primitive(raw, *kind, path),
            ResolvedType::List(element) => {
                let items = raw.as_array().ok_or_else(|| mismatch(path, "array", raw))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.decode_value(item, element, &join_index(path, i)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::List)
            }
            ResolvedType::Object(def) => {
                let map = expect_object(raw, path)?;
                self.build_object(def, map, path).map(FieldValue::Object)
            }
            ResolvedType::Enum(enum_type) => enum_type
                .member_for(raw)
                .map(|member| FieldValue::Enum(member.to_string()))
                .ok_or_else(|| MarshalError::UnknownEnumValue {
                    enum_name: enum_type.name().to_string(),
                    value: raw.to_string(),
                    path: path.to_string(),
                }),
        }
    }
}

fn decode_primitive(raw: &Value, kind: PrimitiveKind, path: &str) -> Result<FieldValue, MarshalError> {
    match (kind, raw) {
        (PrimitiveKind::Int, Value::Number(n)) => decode_int(n, path).map(FieldValue::Int),
        (PrimitiveKind::Float, Value::Number(n)) => n
            .as_f64()
            .map(FieldValue::Float)
            .ok_or_else(|| MarshalError::coercion(path, "float", format!("{n} is not representable"))),
        (PrimitiveKind::Str, Value::String(s)) => Ok(FieldValue::Str(s.clone())),
        (PrimitiveKind::Bool, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
        (PrimitiveKind::Date, Value::String(s)) => parse_date(s)
            .map(FieldValue::Date)
            .map_err(|e| MarshalError::coercion(path, "date", format!("{s:?}: {e}"))),
        (PrimitiveKind::DateTime, Value::String(s)) => DateTimeValue::parse(s)
            .map(FieldValue::DateTime)
            .map_err(|e| MarshalError::coercion(path, "datetime", format!("{s:?}: {e}"))),
        (kind, other) => Err(MarshalError::coercion(
            path,
            kind.as_str(),
            format!("expected a JSON {}, found {}", json_kind_for(kind), json_kind(other)),
        )),
    }
}

fn decode_int(n: &Number, path: &str) -> Result<i64, MarshalError> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(MarshalError::coercion(path, "int", format!("{n} is out of range")));
    }
    match n.as_f64() {
        // -2^63 is exact in f64; 2^63 is the first value past i64::MAX.
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            Err(MarshalError::coercion(path, "int", format!("{n} is out of range")))
        }
        _ => Err(MarshalError::coercion(path, "int", format!("{n} has a fractional part"))),
    }
}

fn json_kind_for(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Int | PrimitiveKind::Float => "number",
        PrimitiveKind::Str | PrimitiveKind::Date | PrimitiveKind::DateTime => "string",
        PrimitiveKind::Bool => "boolean",
    }
}

fn expect_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, MarshalError> {
    value.as_object().ok_or_else(|| mismatch(path, "object", value))
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> MarshalError {
    MarshalError::SchemaMismatch {
        path: path.to_string(),
        expected,
        found: json_kind(found),
    }
}
