//! # Object Model: What a Marshallable Type Declares
//!
//! Marshalling is driven by declarations, not reflection. A type opts in by
//! implementing:
//!
//! - [`Marshallable`], the object-safe accessor surface the engine walks
//!   (`get`/`set` by field name);
//! - [`TypeSchema`], the static declaration registered with the
//!   [`Registry`](crate::Registry): the type's qualified name, its
//!   `(field, descriptor)` list, and optional wire-key aliases.
//!
//! Enumerations implement [`WireEnum`], binding each member to a primitive
//! wire value.
//!
//! ## Example
//!
//! ```
//! use lcore_marshal::{FieldValue, FromField, MarshalError, Marshallable, TypeSchema};
//!
//! #[derive(Debug, Default)]
//! struct Counter {
//!     a_number: Option<i64>,
//! }
//!
//! impl Marshallable for Counter {
//!     fn type_name(&self) -> &'static str {
//!         Self::NAME
//!     }
//!
//!     fn get(&self, field: &str) -> Option<FieldValue> {
//!         match field {
//!             "a_number" => self.a_number.map(FieldValue::from),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set(&mut self, field: &str, value: FieldValue) -> Result<(), MarshalError> {
//!         if field == "a_number" {
//!             self.a_number = Some(i64::from_field(value)?);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl TypeSchema for Counter {
//!     const NAME: &'static str = "demo.Counter";
//!     const FIELD_TYPES: &'static [(&'static str, &'static str)] = &[("a_number", "int")];
//!     const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[("a_number", "aNumber")];
//! }
//! ```

use std::any::Any;
use std::fmt;

use lcore_core::MarshalError;
use serde_json::Value;

use crate::value::FieldValue;

/// Owned downcasting for boxed trait objects.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    /// Convert a boxed value into `Box<dyn Any>` so it can be downcast.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Field-level access to a structured object.
///
/// `get` returns `None` for a field that currently has no value; the engine
/// then omits it from serialized output. `set` receives values already
/// coerced according to the field's descriptor; conversion helpers such as
/// [`FromField`](crate::FromField) and [`FieldValue::into_object`] turn them
/// into the concrete field types.
pub trait Marshallable: AsAny + fmt::Debug + Send {
    /// The name this type is registered under.
    fn type_name(&self) -> &'static str;

    /// Current value of `field`, or `None` if unset.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Assign `field` from a coerced value.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), MarshalError>;
}

/// Static marshalling declaration of a concrete type.
///
/// `FIELD_TYPES` lists `(field name, descriptor)` pairs in the order fields
/// are emitted. `FIELD_ALIASES` maps field names to wire keys; the mapping
/// must be a bijection, which the registry checks at registration.
///
/// `Default` provides the empty instance that deserialization populates
/// field by field.
pub trait TypeSchema: Marshallable + Default + Sized {
    /// Qualified registry name, e.g. `zoo.Compound`.
    const NAME: &'static str;

    /// Marshalled fields and their type descriptors.
    const FIELD_TYPES: &'static [(&'static str, &'static str)];

    /// Field name to wire key remapping.
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[];
}

/// The primitive value an enumeration member is bound to on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireValue {
    /// Integer wire value.
    Int(i64),
    /// String wire value.
    Str(&'static str),
    /// Boolean wire value.
    Bool(bool),
}

impl WireValue {
    /// JSON form of this wire value.
    pub fn to_json(&self) -> Value {
        match *self {
            Self::Int(i) => Value::from(i),
            Self::Str(s) => Value::from(s),
            Self::Bool(b) => Value::Bool(b),
        }
    }
}

/// A closed enumeration whose members are marshalled as wire values.
pub trait WireEnum: Sized + 'static {
    /// Qualified registry name, e.g. `zoo.Animals`.
    const NAME: &'static str;

    /// Every member name with its wire value. Wire values must be unique.
    const MEMBERS: &'static [(&'static str, WireValue)];

    /// The member name of `self`, as listed in `MEMBERS`.
    fn member_name(&self) -> &'static str;

    /// Look a member up by name.
    fn from_member_name(name: &str) -> Option<Self>;
}
