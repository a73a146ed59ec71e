//! # Error Types
//!
//! Every failure the marshalling engine can report. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Configuration defects (`InvalidDescriptor`, `UnknownType`,
//!   `Registration`) point at the type declaration that is wrong.
//! - Data defects (`SchemaMismatch`, `TypeCoercion`, `UnknownEnumValue`)
//!   carry the field path inside the payload, e.g.
//!   `tuple_of_primitives[1].a_date`.
//! - Nothing is retried internally and no partial object is ever returned.

use thiserror::Error;

/// Path label used when a failure happens at the top-level value.
pub const ROOT_PATH: &str = "(root)";

/// Top-level error type for marshalling.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// A type-descriptor string does not match the descriptor grammar.
    #[error("invalid type descriptor {descriptor:?}: {reason}")]
    InvalidDescriptor {
        /// The descriptor text as declared.
        descriptor: String,
        /// What made it unparseable.
        reason: String,
    },

    /// A named reference is not present in the registry.
    #[error("unknown type {name:?}: no type definition or enumeration is registered under this name")]
    UnknownType {
        /// The qualified name that failed to resolve.
        name: String,
    },

    /// Deserialize input is not valid JSON.
    #[error("malformed JSON input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// The decoded JSON has the wrong shape for the declared descriptor.
    #[error("schema mismatch at {path}: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Field path of the offending value.
        path: String,
        /// The JSON kind the descriptor requires.
        expected: &'static str,
        /// The JSON kind actually present.
        found: &'static str,
    },

    /// A decoded primitive cannot be coerced to the declared primitive kind.
    #[error("cannot coerce value at {path} to {expected}: {reason}")]
    TypeCoercion {
        /// Field path of the offending value.
        path: String,
        /// The declared kind, rendered as in the descriptor grammar.
        expected: String,
        /// Why coercion failed.
        reason: String,
    },

    /// No enumeration member is bound to the decoded wire value.
    #[error("enumeration {enum_name} has no member for {value} (at {path})")]
    UnknownEnumValue {
        /// Registered name of the enumeration.
        enum_name: String,
        /// The offending wire value or member name, JSON-rendered.
        value: String,
        /// Field path of the offending value.
        path: String,
    },

    /// The registry was configured inconsistently.
    #[error("registration error: {0}")]
    Registration(String),
}

impl MarshalError {
    /// Build an `InvalidDescriptor` error.
    pub fn invalid_descriptor(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }

    /// Build a `TypeCoercion` error.
    pub fn coercion(
        path: impl Into<String>,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TypeCoercion {
            path: path.into(),
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Re-anchor a data error raised relative to a value (path `(root)`) at
    /// `path`. Errors that already carry a deeper path are returned as is.
    pub fn relative_to(self, path: &str) -> Self {
        match self {
            Self::SchemaMismatch {
                path: p,
                expected,
                found,
            } if p == ROOT_PATH => Self::SchemaMismatch {
                path: path.to_string(),
                expected,
                found,
            },
            Self::TypeCoercion {
                path: p,
                expected,
                reason,
            } if p == ROOT_PATH => Self::TypeCoercion {
                path: path.to_string(),
                expected,
                reason,
            },
            Self::UnknownEnumValue {
                enum_name,
                value,
                path: p,
            } if p == ROOT_PATH => Self::UnknownEnumValue {
                enum_name,
                value,
                path: path.to_string(),
            },
            other => other,
        }
    }

    /// True for errors caused by the type declarations rather than the data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDescriptor { .. } | Self::UnknownType { .. } | Self::Registration(_)
        )
    }
}
