//! The type registry: canonical handles for well-known names and the
//! boxing table.
//!
//! A pure lookup component with no tree interaction. Primitive keywords
//! map to primitive handles directly; every other name goes through the
//! host's symbol table. The boxing table maps each primitive keyword to
//! its wrapper's qualified name and back; comparisons elsewhere in the
//! engine normalize BOTH sides through boxing so that `int` and
//! `java.lang.Integer` compare equal.

use defarg_ast::{Host, Primitive, TypeHandle, ANY_TYPE_NAME};

use crate::error::EngineError;

/// Canonical type lookup and boxing normalization.
#[derive(Debug, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry
    }

    /// Resolve a name to a type handle: primitive keywords directly,
    /// anything else through the host's symbol table. Unresolvable names
    /// are a hard error, not a sentinel.
    pub fn type_by_name(&self, host: &dyn Host, name: &str) -> Result<TypeHandle, EngineError> {
        if let Some(p) = Primitive::from_name(name) {
            return Ok(TypeHandle::Primitive(p));
        }
        host.find_type(name).ok_or_else(|| EngineError::UnresolvedType {
            name: name.to_string(),
        })
    }

    /// The boxed spelling of a type name: primitive keywords map to their
    /// wrapper's qualified name, `<any>` maps to nothing (undetermined
    /// stays undetermined), and every other name maps to itself.
    pub fn boxed_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        match name {
            "int" => Some("java.lang.Integer"),
            "long" => Some("java.lang.Long"),
            "short" => Some("java.lang.Short"),
            "byte" => Some("java.lang.Byte"),
            "char" => Some("java.lang.Character"),
            "float" => Some("java.lang.Float"),
            "double" => Some("java.lang.Double"),
            "boolean" => Some("java.lang.Boolean"),
            "void" => Some("java.lang.Void"),
            ANY_TYPE_NAME => None,
            other => Some(other),
        }
    }

    /// The primitive keyword for a wrapper's qualified name, or `None`
    /// for names that are not wrapper types.
    pub fn unboxed_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        match name {
            "java.lang.Integer" => Some("int"),
            "java.lang.Long" => Some("long"),
            "java.lang.Short" => Some("short"),
            "java.lang.Byte" => Some("byte"),
            "java.lang.Character" => Some("char"),
            "java.lang.Float" => Some("float"),
            "java.lang.Double" => Some("double"),
            "java.lang.Boolean" => Some("boolean"),
            "java.lang.Void" => Some("void"),
            _ => None,
        }
    }

    /// Normalize a handle through the boxing table for comparison:
    /// primitives become their wrapper names, `<any>` becomes `None`.
    pub fn normalize<'a>(&self, handle: &'a TypeHandle) -> Option<&'a str> {
        self.boxed_name(handle.qualified_name())
    }
}
