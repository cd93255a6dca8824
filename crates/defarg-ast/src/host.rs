//! The capability interface to the surrounding compiler.
//!
//! The engine never assumes attribution has already happened and never
//! reaches into compiler internals directly: everything it needs from the
//! host -- type lookup, forcing the checking phase over a subtree, symbol
//! resolution, declared-parameter enumeration -- comes through the
//! [`Host`] trait, injected at the engine boundary. Tests supply an
//! in-memory implementation; production wires up the real compiler.

use std::fmt;

use serde::Serialize;

use crate::path::Path;
use crate::tree::{Ast, NodeId};
use crate::types::TypeHandle;

/// The declared default for one parameter, as recorded by the
/// annotation/configuration surface.
///
/// `Null` is the distinguished "default is null" marker: it is not the
/// absence of a default (that is `ParamInfo::default == None`) and not a
/// literal spelling of the word "null".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DefaultSpec {
    /// Default is the null/empty value of the parameter's type.
    Null,
    /// Default is this literal text, to be coerced per the parameter's
    /// declared type.
    Text(String),
}

/// One declared parameter of a callable, as enumerated by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamInfo {
    /// The parameter's declared type, as a qualified name or primitive
    /// keyword.
    pub type_name: String,
    /// The declared default, if the parameter carries one.
    pub default: Option<DefaultSpec>,
}

/// Failure of the host's attribution service over a subtree.
///
/// The engine propagates these to the driver untouched; what exactly went
/// wrong inside the checking phase is the host's business.
#[derive(Debug, Clone)]
pub struct AttributeError {
    pub node: NodeId,
    pub message: String,
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribution of {} failed: {}", self.node, self.message)
    }
}

impl std::error::Error for AttributeError {}

/// Services the engine consumes from the surrounding compiler.
///
/// All four operations correspond to phases the host already has; none of
/// them are reimplemented here. The trait is object-safe so the engine can
/// hold a `&mut dyn Host`.
pub trait Host {
    /// Static type lookup for an arbitrary subtree, if the checking phase
    /// has determined one.
    fn resolve_type(&self, ast: &Ast, path: &Path) -> Option<TypeHandle>;

    /// Force the checking phase to assign types to a freshly built or
    /// rewritten expression, given the lexical scope it lives in.
    fn attribute(&mut self, ast: &mut Ast, node: NodeId, scope: &Path)
        -> Result<(), AttributeError>;

    /// Resolve the symbol a node refers to back to its declaration (or,
    /// for expressions like creation calls, to the defining tree node).
    /// `None` when the symbol is not tied to any source declaration.
    fn find_declaration(&self, ast: &Ast, path: &Path, node: NodeId) -> Option<NodeId>;

    /// Enumerate the declared parameters of a callable declaration,
    /// including default-value annotations. This is the boundary to the
    /// annotation surface.
    fn enumerate_parameters(&self, ast: &Ast, method: NodeId) -> Vec<ParamInfo>;

    /// Look a declared type up by qualified name in the host's symbol
    /// table. `None` when no such type exists.
    fn find_type(&self, name: &str) -> Option<TypeHandle>;
}
