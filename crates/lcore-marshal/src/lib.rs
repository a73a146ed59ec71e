//! # lcore-marshal: Metadata-Driven Object Marshalling
//!
//! Converts between in-memory objects and JSON mappings using per-type
//! declarations instead of hard-coded field lists.
//!
//! ## Components
//!
//! - **Resolver** ([`registry`]). A frozen [`Registry`] maps qualified names
//!   to [`TypeDefinition`]s and [`EnumType`]s and binds parsed descriptors
//!   (`list[zoo.Primitive]`) to them.
//!
//! - **Engine** ([`engine`], [`decode`]). [`Engine::serialize`] walks an
//!   object's declared fields and emits a `serde_json::Map`;
//!   [`Engine::deserialize`] decodes JSON text and populates a
//!   default-constructed instance. Both recurse through nested types and
//!   lists.
//!
//! - **Object model** ([`model`], [`value`]). Types opt in through
//!   [`Marshallable`] + [`TypeSchema`]; enumerations through [`WireEnum`].
//!   Values cross the boundary as [`FieldValue`]s.
//!
//! ## Usage
//!
//! ```ignore
//! let mut builder = Registry::builder();
//! builder.register::<Primitive>()?.register_enum::<Animals>()?;
//! let engine = Engine::new(builder.build());
//!
//! let json = engine.to_json(&compound)?;
//! let back: Compound = engine.deserialize(&json)?;
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `lcore-core` internally.
//! - The registry is immutable once built and injected explicitly; there is
//!   no global type lookup.
//! - No `unsafe` code, no `.unwrap()` outside tests.

pub mod decode;
pub mod engine;
pub mod model;
pub mod registry;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use decode::json_kind;
pub use engine::Engine;
pub use lcore_core::{DateTimeValue, Descriptor, MarshalError, PrimitiveKind};
pub use model::{AsAny, Marshallable, TypeSchema, WireEnum, WireValue};
pub use registry::{
    Constructor, EnumMember, EnumType, FieldSpec, RegisteredType, Registry, RegistryBuilder,
    ResolvedType, TypeDefinition,
};
pub use value::{FieldValue, FromField};
