//! # Type Descriptors
//!
//! Parses the per-field type annotation strings declared by marshallable
//! types into a structured [`Descriptor`].
//!
//! ## Grammar
//!
//! ```text
//! descriptor := primitive | "list" "[" descriptor "]" | name
//! primitive  := "int" | "float" | "str" | "string" | "bool" | "date" | "datetime"
//! name       := ident ("." ident)*
//! ident      := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Whitespace around a descriptor and inside the brackets is ignored. There
//! are no maps, unions, or optional markers: a field that is absent from the
//! payload is the only form of "optional".
//!
//! Parsing never consults a registry. A well-formed name that nothing is
//! registered under is only reported when it is resolved.

use std::fmt;
use std::str::FromStr;

use crate::error::MarshalError;

/// Primitive field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Signed integer, `int`.
    Int,
    /// Floating point number, `float`.
    Float,
    /// UTF-8 string, `str` or `string`.
    Str,
    /// Boolean, `bool`.
    Bool,
    /// Calendar date, `date`.
    Date,
    /// Date and time of day, `datetime`.
    DateTime,
}

impl PrimitiveKind {
    /// Match a primitive keyword. Keywords are case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "str" | "string" => Some(Self::Str),
            "bool" => Some(Self::Bool),
            "date" => Some(Self::Date),
            "datetime" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// The canonical keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// One of the built-in primitive kinds.
    Primitive(PrimitiveKind),
    /// An ordered sequence whose elements follow the inner descriptor.
    List(Box<Descriptor>),
    /// A reference to a registered type definition or enumeration.
    Named(String),
}

impl Descriptor {
    /// Parse a descriptor string.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::InvalidDescriptor` when the text is empty, has
    /// unbalanced brackets, or contains characters outside the identifier
    /// grammar.
    pub fn parse(text: &str) -> Result<Self, MarshalError> {
        parse_descriptor(text.trim(), text)
    }

    /// The element descriptor if this is a `list[T]`.
    pub fn element(&self) -> Option<&Descriptor> {
        match self {
            Self::List(inner) => Some(inner),
            _ => None,
        }
    }
}

impl FromStr for Descriptor {
    type Err = MarshalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::List(inner) => write!(f, "list[{inner}]"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn parse_descriptor(text: &str, original: &str) -> Result<Descriptor, MarshalError> {
    if text.is_empty() {
        return Err(MarshalError::invalid_descriptor(original, "empty descriptor"));
    }

    if let Some(kind) = PrimitiveKind::from_keyword(text) {
        return Ok(Descriptor::Primitive(kind));
    }

    if let Some(rest) = text.strip_prefix("list") {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Err(MarshalError::invalid_descriptor(
                original,
                "list requires an element type, e.g. list[str]",
            ));
        }
        if let Some(open) = rest.strip_prefix('[') {
            let inner = open.strip_suffix(']').ok_or_else(|| {
                MarshalError::invalid_descriptor(original, "unterminated list[...]")
            })?;
            let element = parse_descriptor(inner.trim(), original)?;
            return Ok(Descriptor::List(Box::new(element)));
        }
        // Anything else (`listing`, `list_item`) is an ordinary identifier.
    }

    validate_name(text, original)?;
    Ok(Descriptor::Named(text.to_string()))
}

fn validate_name(name: &str, original: &str) -> Result<(), MarshalError> {
    for segment in name.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            None => {
                return Err(MarshalError::invalid_descriptor(
                    original,
                    "empty namespace segment",
                ))
            }
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(MarshalError::invalid_descriptor(
                    original,
                    format!("identifier {segment:?} must start with a letter or underscore"),
                ))
            }
            Some(_) => {}
        }
        if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(MarshalError::invalid_descriptor(
                original,
                format!("unexpected character {bad:?} in identifier {segment:?}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(text: &str) {
        match Descriptor::parse(text) {
            Err(MarshalError::InvalidDescriptor { descriptor, .. }) => {
                assert_eq!(descriptor, text)
            }
            other => panic!("expected InvalidDescriptor for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_primitive_keywords() {
        for (text, kind) in [
            ("int", PrimitiveKind::Int),
            ("float", PrimitiveKind::Float),
            ("str", PrimitiveKind::Str),
            ("string", PrimitiveKind::Str),
            ("bool", PrimitiveKind::Bool),
            ("date", PrimitiveKind::Date),
            ("datetime", PrimitiveKind::DateTime),
        ] {
            assert_eq!(Descriptor::parse(text).unwrap(), Descriptor::Primitive(kind));
        }
    }

    #[test]
    fn test_list_of_primitive() {
        let d = Descriptor::parse("list[str]").unwrap();
        assert_eq!(d, Descriptor::List(Box::new(Descriptor::Primitive(PrimitiveKind::Str))));
        assert_eq!(d.element(), Some(&Descriptor::Primitive(PrimitiveKind::Str)));
    }

    #[test]
    fn test_list_of_named() {
        let d = Descriptor::parse("list[test_serializer.Primitive]").unwrap();
        assert_eq!(
            d,
            Descriptor::List(Box::new(Descriptor::Named("test_serializer.Primitive".into())))
        );
    }

    #[test]
    fn test_nested_list() {
        let d = Descriptor::parse("list[list[int]]").unwrap();
        assert_eq!(d.to_string(), "list[list[int]]");
    }

    #[test]
    fn test_whitespace_tolerated() {
        let d = Descriptor::parse("  list[ float ] ").unwrap();
        assert_eq!(d.to_string(), "list[float]");
    }

    #[test]
    fn test_qualified_name() {
        let d: Descriptor = "zoo.animals.Animals".parse().unwrap();
        assert_eq!(d, Descriptor::Named("zoo.animals.Animals".into()));
    }

    #[test]
    fn test_list_prefixed_identifier_is_a_name() {
        assert_eq!(
            Descriptor::parse("listing").unwrap(),
            Descriptor::Named("listing".into())
        );
    }

    #[test]
    fn test_string_alias_displays_as_str() {
        assert_eq!(Descriptor::parse("string").unwrap().to_string(), "str");
    }

    #[test]
    fn test_malformed_descriptors() {
        assert_invalid("list[");
        assert_invalid("list[str");
        assert_invalid("list[]");
        assert_invalid("list");
        assert_invalid("list[str]]");
        assert_invalid("");
        assert_invalid("   ");
        assert_invalid("dict[str, int]");
        assert_invalid("Optional[int]");
        assert_invalid("zoo..Animals");
        assert_invalid(".Animals");
        assert_invalid("9lives");
        assert_invalid("int | None");
    }
}
