//! # lcore-core: Foundational Types for lambdacore
//!
//! This crate is the leaf of the lambdacore workspace. It defines the pieces
//! of the marshalling system that have no notion of a registry or of object
//! traversal:
//!
//! 1. **`MarshalError`.** The single error hierarchy surfaced by every
//!    serialize, deserialize, and registration call.
//!
//! 2. **`Descriptor`.** The parsed form of a per-field type annotation such as
//!    `int`, `list[str]`, or `zoo.Animals`. Parsing is purely syntactic; named
//!    references are resolved later, against a registry, by `lcore-marshal`.
//!
//! 3. **Temporal codecs.** ISO-8601 rendering and parsing for `date` and
//!    `datetime` fields. Datetimes keep exactly the offset they were given:
//!    naive values stay naive, offset values keep their offset.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lcore-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use descriptor::{Descriptor, PrimitiveKind};
pub use error::MarshalError;
pub use temporal::{format_date, parse_date, DateTimeValue};
