//! The uniform invocable view over both call syntaxes.
//!
//! Plain method calls and object-creation calls are different node kinds
//! with different rules, but the matcher and the rewrite pass want one
//! surface: name, owner type, arguments, return type, thrown types. The
//! [`Invocable`] sum type provides that surface with match-based dispatch
//! and enforces the per-variant restrictions as contracts: a constructor's
//! return type is pinned to its owner type, and creation calls refuse
//! declared-thrown-type rewriting outright.

use defarg_ast::{Ast, Expr, NodeId, Path, Primitive, ResolvedMethod, TypeHandle, ANY_TYPE_NAME};

use crate::error::EngineError;
use crate::RewriteCtx;

/// The fixed sentinel naming a constructor, as the host compiler spells
/// it.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A transient per-call-site view unifying the two call-like syntaxes.
///
/// Created per call site during processing, never persisted. All
/// operations take the shared [`RewriteCtx`] because owner-type queries
/// may trigger on-demand attribution.
#[derive(Debug, Clone)]
pub enum Invocable {
    /// A plain method call.
    Plain { node: NodeId, path: Path },
    /// An object-creation call.
    Creation { node: NodeId, path: Path },
}

impl Invocable {
    /// Wrap a call-like node. Creation calls get a placeholder
    /// constructor signature up front when the compiler left theirs
    /// unset; any other node kind is an unsupported shape.
    pub fn wrap(cx: &mut RewriteCtx<'_>, node: NodeId, path: Path) -> Result<Invocable, EngineError> {
        match cx.ast.expr(node) {
            Some(Expr::Call(_)) => Ok(Invocable::Plain { node, path }),
            Some(Expr::New(_)) => {
                let inv = Invocable::Creation { node, path };
                inv.ensure_ctor_signature(cx)?;
                Ok(inv)
            }
            _ => Err(EngineError::UnsupportedShape {
                shape: format!("invocable `{}`", cx.ast.selector_text(node)),
                span: cx.ast.span(node),
            }),
        }
    }

    /// The wrapped call-like node.
    pub fn node(&self) -> NodeId {
        match self {
            Invocable::Plain { node, .. } | Invocable::Creation { node, .. } => *node,
        }
    }

    /// The path from the compilation-unit root to the wrapped node.
    pub fn path(&self) -> &Path {
        match self {
            Invocable::Plain { path, .. } | Invocable::Creation { path, .. } => path,
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(self, Invocable::Creation { .. })
    }

    /// Whether the call names an explicit receiver. Bare-identifier calls
    /// (implicit receiver) answer `false`; creation calls always name the
    /// created type.
    pub fn has_explicit_receiver(&self, ast: &Ast) -> bool {
        match self {
            Invocable::Plain { node, .. } => matches!(
                ast.expr(*node),
                Some(Expr::Call(c)) if matches!(ast.expr(c.select), Some(Expr::FieldAccess(_)))
            ),
            Invocable::Creation { .. } => true,
        }
    }

    /// The invoked member's simple name: the final dot-separated segment
    /// of the target selector, or the constructor sentinel.
    pub fn self_name(&self, ast: &Ast) -> String {
        match self {
            Invocable::Plain { node, .. } => {
                let select = match ast.expr(*node) {
                    Some(Expr::Call(c)) => c.select,
                    _ => unreachable!("Plain invocable always wraps a call node"),
                };
                let text = ast.selector_text(select);
                text.rsplit('.').next().unwrap_or(&text).to_string()
            }
            Invocable::Creation { .. } => CONSTRUCTOR_NAME.to_string(),
        }
    }

    /// The qualified name of the owner type, `<any>` included.
    ///
    /// The creation variant triggers on-demand attribution of its own
    /// node when the compiler has not yet assigned its identifier a
    /// type, then re-reads.
    pub fn owner_type_qualified_name(&self, cx: &mut RewriteCtx<'_>) -> Result<String, EngineError> {
        match self {
            Invocable::Plain { node, path } => {
                let owner =
                    cx.resolver
                        .owner_of_call(cx.ast, cx.host, cx.registry, *node, path)?;
                Ok(owner.qualified_name().to_string())
            }
            Invocable::Creation { node, path } => {
                let owner = cx.resolver.owner_of_new(cx.ast, *node);
                if !owner.is_any() {
                    return Ok(owner.qualified_name().to_string());
                }
                cx.host.attribute(cx.ast, *node, path)?;
                let owner = cx.resolver.owner_of_new(cx.ast, *node);
                Ok(owner.qualified_name().to_string())
            }
        }
    }

    /// The ordered argument list.
    pub fn arguments(&self, ast: &Ast) -> Vec<NodeId> {
        ast.call_args(self.node()).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Replace the argument list. Purely structural; the matcher is
    /// responsible for having produced a type-correct list.
    pub fn set_arguments(&self, ast: &mut Ast, args: Vec<NodeId>) {
        ast.set_call_args(self.node(), args);
    }

    /// The call's return type.
    ///
    /// For creation calls this is always the owner type handle, even
    /// though the stored constructor signature records a void-like
    /// placeholder.
    pub fn return_type(&self, cx: &mut RewriteCtx<'_>) -> Result<TypeHandle, EngineError> {
        match self {
            Invocable::Plain { node, .. } => match cx.ast.expr(*node) {
                Some(Expr::Call(c)) => Ok(c
                    .resolved
                    .as_ref()
                    .map(|r| r.return_type.clone())
                    .or_else(|| cx.ast.ty(*node).cloned())
                    .unwrap_or(TypeHandle::Any)),
                _ => unreachable!("Plain invocable always wraps a call node"),
            },
            Invocable::Creation { .. } => {
                let owner = self.owner_type_qualified_name(cx)?;
                if owner == ANY_TYPE_NAME {
                    return Ok(TypeHandle::Any);
                }
                cx.registry.type_by_name(cx.host, &owner)
            }
        }
    }

    /// Set the call's return type by name.
    ///
    /// Plain calls allow arbitrary reassignment. For creation calls the
    /// write is ignored when the name equals the owner type, and an
    /// invalid-mutation failure otherwise.
    pub fn set_return_type(&self, cx: &mut RewriteCtx<'_>, name: &str) -> Result<(), EngineError> {
        match self {
            Invocable::Plain { node, .. } => {
                let ty = cx.registry.type_by_name(cx.host, name)?;
                match cx.ast.expr_mut(*node) {
                    Some(Expr::Call(c)) => {
                        match &mut c.resolved {
                            Some(r) => r.return_type = ty,
                            None => {
                                c.resolved = Some(ResolvedMethod {
                                    owner: TypeHandle::Any,
                                    return_type: ty,
                                    thrown: Vec::new(),
                                })
                            }
                        }
                        Ok(())
                    }
                    _ => unreachable!("Plain invocable always wraps a call node"),
                }
            }
            Invocable::Creation { node, .. } => {
                let owner = self.owner_type_qualified_name(cx)?;
                if name != owner {
                    return Err(EngineError::ConstructorReturnType {
                        got: name.to_string(),
                        owner,
                        span: cx.ast.span(*node),
                    });
                }
                // The internal representation keeps its void-like
                // placeholder; reads are pinned to the owner type.
                Ok(())
            }
        }
    }

    /// Set the declared thrown types by handle.
    ///
    /// Creation calls do not support declared-exception rewriting and
    /// fail with an unsupported-operation error.
    pub fn set_thrown_types(
        &self,
        cx: &mut RewriteCtx<'_>,
        thrown: Vec<TypeHandle>,
    ) -> Result<(), EngineError> {
        match self {
            Invocable::Plain { node, .. } => match cx.ast.expr_mut(*node) {
                Some(Expr::Call(c)) => {
                    match &mut c.resolved {
                        Some(r) => r.thrown = thrown,
                        None => {
                            c.resolved = Some(ResolvedMethod {
                                owner: TypeHandle::Any,
                                return_type: TypeHandle::Any,
                                thrown,
                            })
                        }
                    }
                    Ok(())
                }
                _ => unreachable!("Plain invocable always wraps a call node"),
            },
            Invocable::Creation { node, .. } => Err(EngineError::ThrownTypesUnsupported {
                span: cx.ast.span(*node),
            }),
        }
    }

    /// Set the declared thrown types by name: each name resolves through
    /// the registry, then the handle form applies. The creation variant
    /// inherits the handle form's failure.
    pub fn set_thrown_type_names(
        &self,
        cx: &mut RewriteCtx<'_>,
        names: &[&str],
    ) -> Result<(), EngineError> {
        let thrown = names
            .iter()
            .map(|name| cx.registry.type_by_name(cx.host, name))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_thrown_types(cx, thrown)
    }

    /// Give a creation call a placeholder constructor signature when the
    /// compiler left it unset: the owner as element and a void-like
    /// return slot. Skipped while the owner is still `<any>` (resolution
    /// deferred).
    fn ensure_ctor_signature(&self, cx: &mut RewriteCtx<'_>) -> Result<(), EngineError> {
        let node = self.node();
        let needs_init = matches!(cx.ast.expr(node), Some(Expr::New(n)) if n.ctor.is_none());
        if !needs_init {
            return Ok(());
        }
        let owner = self.owner_type_qualified_name(cx)?;
        if owner == ANY_TYPE_NAME {
            return Ok(());
        }
        if let Some(Expr::New(n)) = cx.ast.expr_mut(node) {
            n.ctor = Some(ResolvedMethod {
                owner: TypeHandle::named(owner),
                return_type: TypeHandle::Primitive(Primitive::Void),
                thrown: Vec::new(),
            });
        }
        Ok(())
    }
}
