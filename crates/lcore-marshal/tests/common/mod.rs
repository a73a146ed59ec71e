//! Shared fixture types for the integration tests: a flat type covering
//! every primitive kind, an enumeration, a compound type nesting both, and
//! a type with a remapped wire key.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use lcore_marshal::{
    Engine, FieldValue, FromField, MarshalError, Marshallable, Registry, TypeSchema, WireEnum,
    WireValue,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Primitive {
    pub a_number: Option<i64>,
    pub a_float: Option<f64>,
    pub a_string: Option<String>,
    pub a_boolean: Option<bool>,
    pub a_date: Option<NaiveDate>,
    pub a_datetime: Option<NaiveDateTime>,
}

impl Primitive {
    pub fn sample() -> Self {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        Self {
            a_number: Some(1),
            a_float: Some(std::f64::consts::PI),
            a_string: Some("hello world".to_string()),
            a_boolean: Some(true),
            a_date: Some(date),
            a_datetime: Some(date.and_hms_micro_opt(9, 41, 7, 250_031).unwrap()),
        }
    }
}

impl Marshallable for Primitive {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "a_number" => self.a_number.map(FieldValue::from),
            "a_float" => self.a_float.map(FieldValue::from),
            "a_string" => self.a_string.clone().map(FieldValue::from),
            "a_boolean" => self.a_boolean.map(FieldValue::from),
            "a_date" => self.a_date.map(FieldValue::from),
            "a_datetime" => self.a_datetime.map(FieldValue::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), MarshalError> {
        match field {
            "a_number" => self.a_number = Some(FromField::from_field(value)?),
            "a_float" => self.a_float = Some(FromField::from_field(value)?),
            "a_string" => self.a_string = Some(FromField::from_field(value)?),
            "a_boolean" => self.a_boolean = Some(FromField::from_field(value)?),
            "a_date" => self.a_date = Some(FromField::from_field(value)?),
            "a_datetime" => self.a_datetime = Some(FromField::from_field(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl TypeSchema for Primitive {
    const NAME: &'static str = "test_serializer.Primitive";
    const FIELD_TYPES: &'static [(&'static str, &'static str)] = &[
        ("a_number", "int"),
        ("a_float", "float"),
        ("a_string", "str"),
        ("a_boolean", "bool"),
        ("a_date", "date"),
        ("a_datetime", "datetime"),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animals {
    Dog,
    Cat,
    Snake,
}

impl WireEnum for Animals {
    const NAME: &'static str = "test_serializer.Animals";
    const MEMBERS: &'static [(&'static str, WireValue)] = &[
        ("DOG", WireValue::Str("woof")),
        ("CAT", WireValue::Str("meow")),
        ("SNAKE", WireValue::Str("ssssh")),
    ];

    fn member_name(&self) -> &'static str {
        match self {
            Animals::Dog => "DOG",
            Animals::Cat => "CAT",
            Animals::Snake => "SNAKE",
        }
    }

    fn from_member_name(name: &str) -> Option<Self> {
        match name {
            "DOG" => Some(Animals::Dog),
            "CAT" => Some(Animals::Cat),
            "SNAKE" => Some(Animals::Snake),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Compound {
    pub list_of_strings: Option<Vec<String>>,
    pub tuple_of_primitives: Option<Vec<Primitive>>,
    pub an_enum: Option<Animals>,
}

impl Compound {
    pub fn sample() -> Self {
        Self {
            list_of_strings: Some(
                ["spam", "spam", "spam", "Spanish Inquisition"]
                    .map(String::from)
                    .to_vec(),
            ),
            tuple_of_primitives: Some(vec![Primitive::sample(), Primitive::sample()]),
            an_enum: Some(Animals::Snake),
        }
    }
}

impl Marshallable for Compound {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "list_of_strings" => self.list_of_strings.clone().map(FieldValue::from),
            "tuple_of_primitives" => self
                .tuple_of_primitives
                .as_ref()
                .map(|items| FieldValue::list(items.iter().cloned().map(FieldValue::object))),
            "an_enum" => self.an_enum.as_ref().map(FieldValue::enum_member),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), MarshalError> {
        match field {
            "list_of_strings" => self.list_of_strings = Some(FromField::from_field(value)?),
            "tuple_of_primitives" => self.tuple_of_primitives = Some(value.into_objects()?),
            "an_enum" => self.an_enum = Some(value.into_enum()?),
            _ => {}
        }
        Ok(())
    }
}

impl TypeSchema for Compound {
    const NAME: &'static str = "test_serializer.Compound";
    const FIELD_TYPES: &'static [(&'static str, &'static str)] = &[
        ("list_of_strings", "list[str]"),
        ("tuple_of_primitives", "list[test_serializer.Primitive]"),
        ("an_enum", "test_serializer.Animals"),
    ];
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CustomAttribute {
    pub a_number: Option<i64>,
}

impl Marshallable for CustomAttribute {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "a_number" => self.a_number.map(FieldValue::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), MarshalError> {
        if field == "a_number" {
            self.a_number = Some(FromField::from_field(value)?);
        }
        Ok(())
    }
}

impl TypeSchema for CustomAttribute {
    const NAME: &'static str = "test_serializer.CustomAttribute";
    const FIELD_TYPES: &'static [(&'static str, &'static str)] = &[("a_number", "int")];
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[("a_number", "aNumber")];
}

/// A type whose datetime carries an explicit offset, plus a nested object
/// field and a two-level list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Shipment {
    pub shipped_at: Option<DateTime<FixedOffset>>,
    pub origin: Option<Primitive>,
    pub grid: Option<Vec<Vec<i64>>>,
}

impl Marshallable for Shipment {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "shipped_at" => self.shipped_at.map(FieldValue::from),
            "origin" => self.origin.clone().map(FieldValue::object),
            "grid" => self.grid.clone().map(FieldValue::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), MarshalError> {
        match field {
            "shipped_at" => self.shipped_at = Some(FromField::from_field(value)?),
            "origin" => self.origin = Some(value.into_object()?),
            "grid" => self.grid = Some(FromField::from_field(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl TypeSchema for Shipment {
    const NAME: &'static str = "logistics.Shipment";
    const FIELD_TYPES: &'static [(&'static str, &'static str)] = &[
        ("shipped_at", "datetime"),
        ("origin", "test_serializer.Primitive"),
        ("grid", "list[list[int]]"),
    ];
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[("shipped_at", "shippedAt")];
}

pub fn registry() -> Registry {
    let mut builder = Registry::builder();
    builder
        .register::<Primitive>()
        .unwrap()
        .register_enum::<Animals>()
        .unwrap()
        .register::<Compound>()
        .unwrap()
        .register::<CustomAttribute>()
        .unwrap()
        .register::<Shipment>()
        .unwrap();
    builder.build()
}

pub fn engine() -> Engine {
    Engine::new(registry())
}
