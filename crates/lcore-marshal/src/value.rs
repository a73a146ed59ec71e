//! # Field Values
//!
//! [`FieldValue`] is the tagged in-memory value exchanged between the engine
//! and a [`Marshallable`] object. Serialization reads fields as `FieldValue`s
//! and renders them per descriptor; deserialization coerces decoded JSON into
//! `FieldValue`s and hands them to `set`.
//!
//! Conversions out of a `FieldValue` report mismatches as
//! `MarshalError::TypeCoercion` at path `(root)`; the engine re-anchors them
//! at the field being assigned.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use lcore_core::error::ROOT_PATH;
use lcore_core::{DateTimeValue, MarshalError};

use crate::model::{Marshallable, WireEnum};

/// A field's value as seen by the marshalling engine.
#[derive(Debug)]
pub enum FieldValue {
    /// `int`
    Int(i64),
    /// `float`
    Float(f64),
    /// `str`
    Str(String),
    /// `bool`
    Bool(bool),
    /// `date`
    Date(NaiveDate),
    /// `datetime`
    DateTime(DateTimeValue),
    /// An enumeration member, by member name.
    Enum(String),
    /// `list[T]`
    List(Vec<FieldValue>),
    /// A nested registered type.
    Object(Box<dyn Marshallable>),
}

impl FieldValue {
    /// Wrap a nested object.
    pub fn object<T: Marshallable>(value: T) -> Self {
        Self::Object(Box::new(value))
    }

    /// Wrap an enumeration member.
    pub fn enum_member<E: WireEnum>(member: &E) -> Self {
        Self::Enum(member.member_name().to_string())
    }

    /// Build a list from anything convertible into field values.
    pub fn list<T: Into<FieldValue>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Enum(_) => "enum member",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Unwrap a nested object of concrete type `T`.
    pub fn into_object<T: Marshallable>(self) -> Result<T, MarshalError> {
        match self {
            Self::Object(boxed) => {
                let found = boxed.type_name();
                let any = crate::model::AsAny::into_any(boxed);
                any.downcast::<T>()
                    .map(|b| *b)
                    .map_err(|_| mismatch(std::any::type_name::<T>(), found))
            }
            other => Err(mismatch(std::any::type_name::<T>(), other.kind())),
        }
    }

    /// Unwrap an enumeration member of type `E`.
    pub fn into_enum<E: WireEnum>(self) -> Result<E, MarshalError> {
        match self {
            Self::Enum(name) => {
                E::from_member_name(&name).ok_or_else(|| MarshalError::UnknownEnumValue {
                    enum_name: E::NAME.to_string(),
                    value: format!("{name:?}"),
                    path: ROOT_PATH.to_string(),
                })
            }
            other => Err(mismatch(E::NAME, other.kind())),
        }
    }

    /// Unwrap a list.
    pub fn into_list(self) -> Result<Vec<FieldValue>, MarshalError> {
        match self {
            Self::List(items) => Ok(items),
            other => Err(mismatch("list", other.kind())),
        }
    }

    /// Unwrap a list of nested objects of type `T`.
    pub fn into_objects<T: Marshallable>(self) -> Result<Vec<T>, MarshalError> {
        self.into_list()?
            .into_iter()
            .map(FieldValue::into_object)
            .collect()
    }

    /// Unwrap a list of enumeration members of type `E`.
    pub fn into_enums<E: WireEnum>(self) -> Result<Vec<E>, MarshalError> {
        self.into_list()?
            .into_iter()
            .map(FieldValue::into_enum)
            .collect()
    }
}

fn mismatch(expected: &str, found: &str) -> MarshalError {
    MarshalError::coercion(ROOT_PATH, expected, format!("found {found}"))
}

/// Conversion from a coerced [`FieldValue`] into a concrete field type.
pub trait FromField: Sized {
    /// Convert, or report a `TypeCoercion` error.
    fn from_field(value: FieldValue) -> Result<Self, MarshalError>;
}

impl FromField for i64 {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match value {
            FieldValue::Int(i) => Ok(i),
            other => Err(mismatch("int", other.kind())),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromField for $ty {
                fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
                    let wide = i64::from_field(value)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        MarshalError::coercion(
                            ROOT_PATH,
                            stringify!($ty),
                            format!("{wide} is out of range"),
                        )
                    })
                }
            }

            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

narrow_int!(i8, i16, i32, u8, u16, u32);

impl FromField for u64 {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        let wide = i64::from_field(value)?;
        u64::try_from(wide).map_err(|_| {
            MarshalError::coercion(ROOT_PATH, "u64", format!("{wide} is out of range"))
        })
    }
}

impl FromField for f64 {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match value {
            FieldValue::Float(f) => Ok(f),
            FieldValue::Int(i) => Ok(i as f64),
            other => Err(mismatch("float", other.kind())),
        }
    }
}

impl FromField for String {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match value {
            FieldValue::Str(s) => Ok(s),
            other => Err(mismatch("str", other.kind())),
        }
    }
}

impl FromField for bool {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(mismatch("bool", other.kind())),
        }
    }
}

impl FromField for NaiveDate {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match value {
            FieldValue::Date(d) => Ok(d),
            other => Err(mismatch("date", other.kind())),
        }
    }
}

impl FromField for DateTimeValue {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt),
            other => Err(mismatch("datetime", other.kind())),
        }
    }
}

impl FromField for NaiveDateTime {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match DateTimeValue::from_field(value)? {
            DateTimeValue::Naive(dt) => Ok(dt),
            DateTimeValue::Offset(dt) => Err(MarshalError::coercion(
                ROOT_PATH,
                "naive datetime",
                format!("{dt} carries a UTC offset"),
            )),
        }
    }
}

impl FromField for DateTime<FixedOffset> {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        match DateTimeValue::from_field(value)? {
            DateTimeValue::Offset(dt) => Ok(dt),
            DateTimeValue::Naive(dt) => Err(MarshalError::coercion(
                ROOT_PATH,
                "offset datetime",
                format!("{dt} has no UTC offset"),
            )),
        }
    }
}

impl<T: FromField> FromField for Vec<T> {
    fn from_field(value: FieldValue) -> Result<Self, MarshalError> {
        value.into_list()?.into_iter().map(T::from_field).collect()
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTimeValue> for FieldValue {
    fn from(v: DateTimeValue) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(DateTimeValue::Naive(v))
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Self::DateTime(DateTimeValue::Offset(v))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(DateTimeValue::from(v))
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}
