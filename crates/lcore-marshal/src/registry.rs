//! # Type Registry and Descriptor Resolution
//!
//! The registry maps qualified names to [`TypeDefinition`]s and
//! [`EnumType`]s so that named references in descriptor strings can be
//! resolved to concrete declarations.
//!
//! ## Lifecycle
//!
//! A [`RegistryBuilder`] collects registrations at startup and checks each
//! one for configuration defects (duplicate names, wire-key collisions,
//! duplicate enumeration wire values). [`RegistryBuilder::build`] freezes it
//! into an immutable [`Registry`], which the engine shares behind an `Arc`.
//! There is no late registration and no global registry.
//!
//! Descriptor strings are stored as declared and parsed at resolution time,
//! so a malformed descriptor surfaces as `InvalidDescriptor` the first time
//! it is used. [`Registry::verify`] resolves every declaration eagerly for
//! callers that want to fail at startup instead.

use std::collections::{BTreeMap, HashMap, HashSet};

use lcore_core::{Descriptor, MarshalError, PrimitiveKind};
use serde_json::Value;

use crate::model::{Marshallable, TypeSchema, WireEnum};

/// Produces an empty instance for field-by-field population.
pub type Constructor = fn() -> Box<dyn Marshallable>;

fn construct_default<T: TypeSchema>() -> Box<dyn Marshallable> {
    Box::new(T::default())
}

/// One declared field of a type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as passed to `get`/`set`.
    pub name: String,
    /// Type descriptor string, parsed on use.
    pub descriptor: String,
}

/// The marshalling declaration of a structured type.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    name: String,
    fields: Vec<FieldSpec>,
    aliases: BTreeMap<String, String>,
    realiased: Vec<String>,
    construct: Constructor,
}

impl TypeDefinition {
    /// Start a definition for `name` with no fields.
    pub fn new(name: impl Into<String>, construct: Constructor) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            aliases: BTreeMap::new(),
            realiased: Vec::new(),
            construct,
        }
    }

    /// Build the definition declared by a [`TypeSchema`] implementation.
    pub fn of<T: TypeSchema>() -> Self {
        let mut def = Self::new(T::NAME, construct_default::<T>);
        for (field, descriptor) in T::FIELD_TYPES {
            def = def.field(*field, *descriptor);
        }
        for (field, wire_key) in T::FIELD_ALIASES {
            def = def.alias(*field, *wire_key);
        }
        def
    }

    /// Declare a field.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            descriptor: descriptor.into(),
        });
        self
    }

    /// Remap a field to a different wire key.
    pub fn alias(mut self, field: impl Into<String>, wire_key: impl Into<String>) -> Self {
        let field = field.into();
        if self.aliases.insert(field.clone(), wire_key.into()).is_some() {
            self.realiased.push(field);
        }
        self
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// The wire key of a field: its alias if declared, else its name.
    pub fn wire_key<'a>(&'a self, field: &'a FieldSpec) -> &'a str {
        self.aliases
            .get(&field.name)
            .map(String::as_str)
            .unwrap_or(&field.name)
    }

    /// A fresh, empty instance.
    pub fn instantiate(&self) -> Box<dyn Marshallable> {
        (self.construct)()
    }

    fn validate(&self) -> Result<(), MarshalError> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(MarshalError::Registration(format!(
                    "type {} declares field {:?} more than once",
                    self.name, field.name
                )));
            }
        }

        if let Some(field) = self.realiased.first() {
            return Err(MarshalError::Registration(format!(
                "type {} aliases field {field:?} more than once",
                self.name
            )));
        }

        for field in self.aliases.keys() {
            if !names.contains(field.as_str()) {
                return Err(MarshalError::Registration(format!(
                    "type {} aliases undeclared field {field:?}",
                    self.name
                )));
            }
        }

        let mut wire_keys: HashMap<&str, &str> = HashMap::new();
        for field in &self.fields {
            let key = self.wire_key(field);
            if let Some(previous) = wire_keys.insert(key, &field.name) {
                return Err(MarshalError::Registration(format!(
                    "type {}: fields {previous:?} and {:?} both map to wire key {key:?}",
                    self.name, field.name
                )));
            }
        }
        Ok(())
    }
}

/// One member of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Primitive wire value.
    pub wire: Value,
}

/// The marshalling declaration of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    name: String,
    members: Vec<EnumMember>,
}

impl EnumType {
    /// Start an enumeration with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Build the enumeration declared by a [`WireEnum`] implementation.
    pub fn of<E: WireEnum>() -> Self {
        let mut ty = Self::new(E::NAME);
        for (member, wire) in E::MEMBERS {
            ty = ty.member(*member, wire.to_json());
        }
        ty
    }

    /// Declare a member bound to `wire`.
    pub fn member(mut self, name: impl Into<String>, wire: impl Into<Value>) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            wire: wire.into(),
        });
        self
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Wire value bound to a member name.
    pub fn wire_value(&self, member: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|m| m.name == member)
            .map(|m| &m.wire)
    }

    /// Member bound to a decoded wire value. Numbers match by value, so
    /// `1.0` finds the member bound to `1`.
    pub fn member_for(&self, wire: &Value) -> Option<&str> {
        self.members
            .iter()
            .find(|m| wire_eq(&m.wire, wire))
            .map(|m| m.name.as_str())
    }

    fn validate(&self) -> Result<(), MarshalError> {
        let mut names = HashSet::new();
        for (i, member) in self.members.iter().enumerate() {
            if !matches!(
                member.wire,
                Value::String(_) | Value::Number(_) | Value::Bool(_)
            ) {
                return Err(MarshalError::Registration(format!(
                    "enumeration {}: member {:?} must be bound to a string, number, or boolean, got {}",
                    self.name, member.name, member.wire
                )));
            }
            if !names.insert(member.name.as_str()) {
                return Err(MarshalError::Registration(format!(
                    "enumeration {} declares member {:?} more than once",
                    self.name, member.name
                )));
            }
            if let Some(other) = self.members[..i]
                .iter()
                .find(|m| wire_eq(&m.wire, &member.wire))
            {
                return Err(MarshalError::Registration(format!(
                    "enumeration {}: members {:?} and {:?} share wire value {}",
                    self.name, other.name, member.name, member.wire
                )));
            }
        }
        Ok(())
    }
}

fn wire_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        _ => a == b,
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Type(TypeDefinition),
    Enum(EnumType),
}

/// A registry entry, as returned by [`Registry::lookup`].
#[derive(Debug, Clone, Copy)]
pub enum RegisteredType<'r> {
    /// A structured type.
    Type(&'r TypeDefinition),
    /// An enumeration.
    Enum(&'r EnumType),
}

/// A descriptor with every named reference bound to its declaration.
#[derive(Debug, Clone)]
pub enum ResolvedType<'r> {
    /// Built-in primitive.
    Primitive(PrimitiveKind),
    /// Ordered sequence of the inner type.
    List(Box<ResolvedType<'r>>),
    /// Nested structured type.
    Object(&'r TypeDefinition),
    /// Enumeration.
    Enum(&'r EnumType),
}

/// Collects registrations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Entry>,
}

impl RegistryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a structured type by its [`TypeSchema`] declaration.
    pub fn register<T: TypeSchema>(&mut self) -> Result<&mut Self, MarshalError> {
        self.define(TypeDefinition::of::<T>())
    }

    /// Register an enumeration by its [`WireEnum`] declaration.
    pub fn register_enum<E: WireEnum>(&mut self) -> Result<&mut Self, MarshalError> {
        self.define_enum(EnumType::of::<E>())
    }

    /// Register a hand-built type definition.
    pub fn define(&mut self, def: TypeDefinition) -> Result<&mut Self, MarshalError> {
        def.validate()?;
        self.insert(def.name.clone(), Entry::Type(def))
    }

    /// Register a hand-built enumeration.
    pub fn define_enum(&mut self, ty: EnumType) -> Result<&mut Self, MarshalError> {
        ty.validate()?;
        self.insert(ty.name.clone(), Entry::Enum(ty))
    }

    fn insert(&mut self, name: String, entry: Entry) -> Result<&mut Self, MarshalError> {
        let is_name = matches!(
            Descriptor::parse(&name),
            Ok(Descriptor::Named(ref parsed)) if *parsed == name
        );
        if !is_name {
            return Err(MarshalError::Registration(format!(
                "{name:?} is not a valid qualified type name"
            )));
        }
        if self.entries.contains_key(&name) {
            return Err(MarshalError::Registration(format!(
                "{name:?} is already registered"
            )));
        }
        tracing::debug!(name = %name, "registered marshalling type");
        self.entries.insert(name, entry);
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

/// Immutable name → declaration map used to resolve descriptors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a name.
    pub fn lookup(&self, name: &str) -> Option<RegisteredType<'_>> {
        self.entries.get(name).map(|entry| match entry {
            Entry::Type(def) => RegisteredType::Type(def),
            Entry::Enum(ty) => RegisteredType::Enum(ty),
        })
    }

    /// The type definition registered under `name`.
    ///
    /// # Errors
    ///
    /// `UnknownType` if nothing is registered under `name`; `Registration`
    /// if `name` is an enumeration.
    pub fn type_definition(&self, name: &str) -> Result<&TypeDefinition, MarshalError> {
        match self.lookup(name) {
            Some(RegisteredType::Type(def)) => Ok(def),
            Some(RegisteredType::Enum(_)) => Err(MarshalError::Registration(format!(
                "{name:?} is registered as an enumeration, not a type definition"
            ))),
            None => Err(MarshalError::UnknownType {
                name: name.to_string(),
            }),
        }
    }

    /// Bind every named reference in `descriptor`.
    ///
    /// # Errors
    ///
    /// `UnknownType` if a named reference is not registered.
    pub fn resolve(&self, descriptor: &Descriptor) -> Result<ResolvedType<'_>, MarshalError> {
        match descriptor {
            Descriptor::Primitive(kind) => Ok(ResolvedType::Primitive(*kind)),
            Descriptor::List(inner) => Ok(ResolvedType::List(Box::new(self.resolve(inner)?))),
            Descriptor::Named(name) => match self.lookup(name) {
                Some(RegisteredType::Type(def)) => Ok(ResolvedType::Object(def)),
                Some(RegisteredType::Enum(ty)) => Ok(ResolvedType::Enum(ty)),
                None => Err(MarshalError::UnknownType { name: name.clone() }),
            },
        }
    }

    /// Parse and resolve a descriptor string.
    ///
    /// # Errors
    ///
    /// `InvalidDescriptor` for malformed text, `UnknownType` for an
    /// unregistered reference.
    pub fn resolve_str(&self, descriptor: &str) -> Result<ResolvedType<'_>, MarshalError> {
        self.resolve(&Descriptor::parse(descriptor)?)
    }

    /// Resolve every declared field descriptor, failing on the first defect.
    pub fn verify(&self) -> Result<(), MarshalError> {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        for name in names {
            if let Some(Entry::Type(def)) = self.entries.get(name) {
                for field in def.fields() {
                    self.resolve_str(&field.descriptor)?;
                }
            }
        }
        Ok(())
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
