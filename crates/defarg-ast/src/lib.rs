//! Syntax-tree model of the host object language, as seen by the
//! default-argument rewriting engine.
//!
//! The engine does not parse source text. It operates on an in-memory tree
//! the host compiler hands it: expressions (identifiers, member accesses,
//! calls, object creations, literals) and the declarations they live in
//! (classes, methods, variables). Nodes are stored in an arena and
//! addressed by stable [`tree::NodeId`]s, so per-node facts (attributed
//! types, owner-type overrides, visited sets) live in identity-keyed side
//! tables rather than on the nodes themselves. Two structurally identical
//! call sites never collide.
//!
//! # Architecture
//!
//! - [`tree`]: the node arena, expression and declaration kinds, literal
//!   values, and resolved-signature slots filled in by attribution.
//! - [`types`]: primitive kinds and the [`types::TypeHandle`] used for
//!   every attributed type, including the `<any>` sentinel.
//! - [`path`]: root-to-node ancestor chains for lexical-context queries
//!   (nearest enclosing class or method).
//! - [`host`]: the capability trait modeling the surrounding compiler
//!   (type lookup, on-demand attribution, symbol resolution, declared
//!   parameter enumeration).

pub mod host;
pub mod path;
pub mod tree;
pub mod types;

pub use host::{AttributeError, DefaultSpec, Host, ParamInfo};
pub use path::Path;
pub use tree::{
    Ast, CallExpr, ClassDecl, Decl, Expr, FieldAccess, Ident, LitValue, LiteralExpr, MethodDecl,
    NewExpr, Node, NodeId, ParamDecl, ResolvedMethod, VarDecl,
};
pub use types::{Primitive, TypeHandle, ANY_TYPE_NAME};
