//! Type handles for attributed tree nodes.
//!
//! A [`TypeHandle`] is the engine's view of a resolved type: either one of
//! a fixed set of primitive kinds, a declared type addressed by qualified
//! name, or the distinguished `<any>` sentinel for "not determined yet".
//! The sentinel is a value, never a null: it propagates through matching
//! and resolution without erroring until an operation strictly requires a
//! concrete type.

use std::fmt;

use serde::Serialize;

/// The canonical name text of the `<any>` sentinel, matching what the
/// host compiler prints for an undetermined type.
pub const ANY_TYPE_NAME: &str = "<any>";

/// The fixed set of primitive kinds in the host language.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    Int,
    Long,
    Short,
    Byte,
    Char,
    Float,
    Double,
    Boolean,
    Void,
}

impl Primitive {
    /// All primitive kinds, in a stable order. Used to build registry
    /// tables and to sweep every primitive/boxed pair in tests.
    pub const ALL: [Primitive; 9] = [
        Primitive::Int,
        Primitive::Long,
        Primitive::Short,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Float,
        Primitive::Double,
        Primitive::Boolean,
        Primitive::Void,
    ];

    /// The source-level keyword for this primitive.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Short => "short",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Boolean => "boolean",
            Primitive::Void => "void",
        }
    }

    /// Parse a source-level keyword back into a primitive kind.
    pub fn from_name(name: &str) -> Option<Primitive> {
        Primitive::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An opaque reference to a resolved type.
///
/// Every handle is exactly one primitive kind, or resolves to exactly one
/// declared symbol by qualified name, or is the [`TypeHandle::Any`]
/// sentinel. Handles are cheap to clone and compare; identity of declared
/// types is their qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeHandle {
    /// One of the fixed primitive kinds.
    Primitive(Primitive),
    /// A declared type, addressed by fully qualified name
    /// (e.g. `java.lang.String`, `net.Client`).
    Named(String),
    /// The `<any>` sentinel: type not determined yet. Propagates without
    /// erroring; callers that need a concrete type must check for it.
    Any,
}

impl TypeHandle {
    /// Build a handle for a declared type.
    pub fn named(name: impl Into<String>) -> TypeHandle {
        TypeHandle::Named(name.into())
    }

    /// The canonical name text of this handle: the primitive keyword, the
    /// qualified name, or `<any>` for the sentinel.
    pub fn qualified_name(&self) -> &str {
        match self {
            TypeHandle::Primitive(p) => p.name(),
            TypeHandle::Named(name) => name,
            TypeHandle::Any => ANY_TYPE_NAME,
        }
    }

    /// Whether this is the `<any>` sentinel.
    pub fn is_any(&self) -> bool {
        matches!(self, TypeHandle::Any)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}
