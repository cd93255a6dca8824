//! The node arena: expressions, declarations, and their attributed types.
//!
//! All nodes live in one [`Ast`] arena and are addressed by [`NodeId`].
//! Attributed types and source spans are stored in side tables parallel to
//! the node vector, so the host's attribution phase can fill them in
//! incrementally and the engine can read them without touching node
//! structure. The only structural mutation the engine ever performs is
//! replacing a call-like node's argument list.

use std::fmt;
use std::fmt::Write as _;

use defarg_common::Span;
use serde::Serialize;

use crate::host::DefaultSpec;
use crate::types::TypeHandle;

/// Stable identity of a node in the arena.
///
/// Ids are assigned at allocation and never reused, which makes them safe
/// keys for identity-keyed side tables (owner-type overrides, visited
/// sets, caches).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Any node: an expression or a declaration.
#[derive(Debug, Clone)]
pub enum Node {
    Expr(Expr),
    Decl(Decl),
}

// ── Expressions ────────────────────────────────────────────────────────

/// Any expression node the engine knows how to look at.
///
/// This set is intentionally narrow: the engine enumerates exactly the
/// shapes it can resolve an owner type for, and anything else is a hard
/// "unsupported shape" failure rather than a silent guess.
#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    FieldAccess(FieldAccess),
    Call(CallExpr),
    New(NewExpr),
    Literal(LiteralExpr),
}

/// A bare identifier reference (`port`, `Client`).
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
}

/// A member access `receiver.name`.
#[derive(Debug, Clone)]
pub struct FieldAccess {
    pub receiver: NodeId,
    pub name: String,
}

/// A plain method call. `select` is the target selector: an [`Ident`]
/// (implicit receiver) or a [`FieldAccess`] (explicit receiver).
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub select: NodeId,
    pub args: Vec<NodeId>,
    /// The compiler-attributed target signature, once attribution has run.
    pub resolved: Option<ResolvedMethod>,
}

/// An object-creation call `new T(args)`. `type_ident` is the identifier
/// node naming the created type.
#[derive(Debug, Clone)]
pub struct NewExpr {
    pub type_ident: NodeId,
    pub args: Vec<NodeId>,
    /// The attributed constructor signature. Its recorded return type is
    /// void-like; the invocable layer pins reads to the owner type.
    pub ctor: Option<ResolvedMethod>,
}

/// A literal expression.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: LitValue,
}

/// A literal value, typed per the host language's literal kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LitValue {
    Str(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Null,
}

impl fmt::Display for LitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LitValue::Str(s) => write!(f, "{s:?}"),
            LitValue::Int(v) => write!(f, "{v}"),
            LitValue::Long(v) => write!(f, "{v}L"),
            LitValue::Float(v) => write!(f, "{v}f"),
            LitValue::Double(v) => write!(f, "{v}"),
            LitValue::Bool(v) => write!(f, "{v}"),
            LitValue::Char(c) => write!(f, "'{c}'"),
            LitValue::Null => write!(f, "null"),
        }
    }
}

/// A resolved callable signature attached to a call-like node by
/// attribution: who owns it, what it returns, what it declares thrown.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMethod {
    pub owner: TypeHandle,
    pub return_type: TypeHandle,
    pub thrown: Vec<TypeHandle>,
}

// ── Declarations ───────────────────────────────────────────────────────

/// Any declaration node.
#[derive(Debug, Clone)]
pub enum Decl {
    Class(ClassDecl),
    Method(MethodDecl),
    Var(VarDecl),
}

/// A class declaration. The fully qualified name is `package.name`.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub package: String,
    pub members: Vec<NodeId>,
}

impl ClassDecl {
    /// `package.name`, or just `name` for the unnamed package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// A method (or constructor) declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub return_type: String,
    pub body: Vec<NodeId>,
}

/// One declared parameter, with the default-value annotation if present.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub type_name: String,
    pub default: Option<DefaultSpec>,
}

/// A local variable or field declaration.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub declared_type: String,
    pub init: Option<NodeId>,
}

// ── Arena ──────────────────────────────────────────────────────────────

/// The node arena plus the side tables attribution fills in.
///
/// Nodes are append-only; ids are never invalidated. The attributed-type
/// slot of a node is `None` until the host's checking phase assigns it.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    types: Vec<Option<TypeHandle>>,
    spans: Vec<Span>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast::default()
    }

    fn push(&mut self, node: Node, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.types.push(None);
        self.spans.push(span);
        id
    }

    /// Allocate an expression node.
    pub fn alloc_expr(&mut self, expr: Expr, span: Span) -> NodeId {
        self.push(Node::Expr(expr), span)
    }

    /// Allocate a declaration node.
    pub fn alloc_decl(&mut self, decl: Decl, span: Span) -> NodeId {
        self.push(Node::Decl(decl), span)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node as an expression, or `None` for declarations.
    pub fn expr(&self, id: NodeId) -> Option<&Expr> {
        match self.node(id) {
            Node::Expr(e) => Some(e),
            Node::Decl(_) => None,
        }
    }

    pub fn expr_mut(&mut self, id: NodeId) -> Option<&mut Expr> {
        match &mut self.nodes[id.index()] {
            Node::Expr(e) => Some(e),
            Node::Decl(_) => None,
        }
    }

    /// The node as a declaration, or `None` for expressions.
    pub fn decl(&self, id: NodeId) -> Option<&Decl> {
        match self.node(id) {
            Node::Decl(d) => Some(d),
            Node::Expr(_) => None,
        }
    }

    pub fn decl_mut(&mut self, id: NodeId) -> Option<&mut Decl> {
        match &mut self.nodes[id.index()] {
            Node::Decl(d) => Some(d),
            Node::Expr(_) => None,
        }
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    /// The attributed type of a node, if attribution has assigned one.
    pub fn ty(&self, id: NodeId) -> Option<&TypeHandle> {
        self.types[id.index()].as_ref()
    }

    /// Assign an attributed type. Only the host's attribution service and
    /// the rewrite pass (for synthesized literals) call this.
    pub fn set_ty(&mut self, id: NodeId, ty: TypeHandle) {
        self.types[id.index()] = Some(ty);
    }

    // ── Call-like access ────────────────────────────────────────────────

    /// The argument list of a call or creation node.
    pub fn call_args(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.expr(id)? {
            Expr::Call(c) => Some(&c.args),
            Expr::New(n) => Some(&n.args),
            _ => None,
        }
    }

    /// Replace the argument list of a call or creation node. Purely
    /// structural; no type checking happens here.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a call-like node. The invocable layer
    /// guarantees the kind by construction.
    pub fn set_call_args(&mut self, id: NodeId, args: Vec<NodeId>) {
        match self.expr_mut(id) {
            Some(Expr::Call(c)) => c.args = args,
            Some(Expr::New(n)) => n.args = args,
            _ => panic!("set_call_args on non-call node {id}"),
        }
    }

    // ── Selector text ───────────────────────────────────────────────────

    /// Render an expression as dotted selector text, the way the host
    /// compiler would print it. Used to derive a call's target simple
    /// name (the final dot-separated segment) and for display.
    pub fn selector_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_selector(id, &mut out);
        out
    }

    fn write_selector(&self, id: NodeId, out: &mut String) {
        match self.expr(id) {
            Some(Expr::Ident(i)) => out.push_str(&i.name),
            Some(Expr::FieldAccess(fa)) => {
                self.write_selector(fa.receiver, out);
                out.push('.');
                out.push_str(&fa.name);
            }
            Some(Expr::Call(c)) => {
                self.write_selector(c.select, out);
                out.push_str("()");
            }
            Some(Expr::New(n)) => {
                out.push_str("new ");
                self.write_selector(n.type_ident, out);
                out.push_str("()");
            }
            Some(Expr::Literal(l)) => {
                let _ = write!(out, "{}", l.value);
            }
            None => out.push_str("<decl>"),
        }
    }
}
