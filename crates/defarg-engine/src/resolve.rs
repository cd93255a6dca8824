//! Owner/receiver type resolution.
//!
//! Given a call-like node and its position in the tree, determine the
//! static type of the object that owns the invoked member -- even when the
//! compiler's own attribution of that subtree has not run yet. Dispatch is
//! exhaustive-but-narrow over the enumerated expression shapes; anything
//! else is a hard "unsupported shape" failure, never a silent fallback
//! that could mis-resolve.
//!
//! The resolver also owns the two pieces of per-run side state: the
//! per-call-site owner cache and the effective-owner override map for
//! creation calls whose identifier type the compiler never attributed.

use defarg_ast::{Ast, Decl, Expr, Host, Node, NodeId, Path, TypeHandle};
use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::registry::TypeRegistry;

/// Owner-type resolution with per-run caches.
///
/// One resolver lives for one compilation run: the override map and the
/// owner cache are cleared by constructing a fresh resolver at run start,
/// and individual entries are never removed.
#[derive(Debug, Default)]
pub struct OwnerResolver {
    /// Resolved owner names per call-site identity. Only concrete (non
    /// `<any>`) results are cached: a deferred resolution may still be
    /// completed by later attribution.
    owner_cache: FxHashMap<NodeId, String>,
    /// Effective-owner overrides for creation calls, keyed by node
    /// identity. Consulted before the identifier's attributed type, and
    /// only ever for creation calls.
    ctor_owners: FxHashMap<NodeId, String>,
}

impl OwnerResolver {
    pub fn new() -> OwnerResolver {
        OwnerResolver::default()
    }

    /// Assert the owner type of a creation call the compiler has not
    /// attributed. Called by the rewrite pass; entries stay for the rest
    /// of the run.
    pub fn add_ctor_owner(&mut self, node: NodeId, owner: impl Into<String>) {
        self.ctor_owners.insert(node, owner.into());
    }

    /// Owner type of a call-like node.
    ///
    /// Returns the `<any>` sentinel when resolution is deferred pending
    /// attribution; callers must treat that as "unconstrained", not as a
    /// failure.
    pub fn owner_of_call(
        &mut self,
        ast: &Ast,
        host: &dyn Host,
        registry: &TypeRegistry,
        call: NodeId,
        path: &Path,
    ) -> Result<TypeHandle, EngineError> {
        if let Some(cached) = self.owner_cache.get(&call) {
            return Ok(TypeHandle::named(cached.clone()));
        }
        let resolved = match ast.expr(call) {
            Some(Expr::Call(c)) => match ast.expr(c.select) {
                Some(Expr::FieldAccess(fa)) => {
                    let receiver_path = path.descend(c.select).descend(fa.receiver);
                    self.owner_from_member_select(ast, host, registry, fa.receiver, &receiver_path)?
                }
                Some(Expr::Ident(_)) => owner_from_identifier(ast, path)?,
                _ => {
                    return Err(EngineError::UnsupportedShape {
                        shape: format!("call target selector `{}`", ast.selector_text(c.select)),
                        span: ast.span(c.select),
                    })
                }
            },
            Some(Expr::New(_)) => self.owner_of_new(ast, call),
            _ => {
                return Err(EngineError::UnsupportedShape {
                    shape: format!("non-call node `{}`", ast.selector_text(call)),
                    span: ast.span(call),
                })
            }
        };
        if let TypeHandle::Named(name) = &resolved {
            self.owner_cache.insert(call, name.clone());
        }
        Ok(resolved)
    }

    /// Owner type of a creation call itself (not a member access on its
    /// result): override map first, then the identifier's attributed
    /// type, then the `<any>` sentinel. Never fails -- `<any>` means
    /// "resolution deferred".
    pub fn owner_of_new(&self, ast: &Ast, node: NodeId) -> TypeHandle {
        if let Some(owner) = self.ctor_owners.get(&node) {
            return TypeHandle::named(owner.clone());
        }
        if let Some(Expr::New(n)) = ast.expr(node) {
            if let Some(ty) = ast.ty(n.type_ident) {
                return ty.clone();
            }
        }
        TypeHandle::Any
    }

    /// Owner type for `a.b(...)`: resolve the symbol bound to `a` and
    /// dispatch on its syntactic category.
    fn owner_from_member_select(
        &self,
        ast: &Ast,
        host: &dyn Host,
        registry: &TypeRegistry,
        receiver: NodeId,
        receiver_path: &Path,
    ) -> Result<TypeHandle, EngineError> {
        match host.find_declaration(ast, receiver_path, receiver) {
            Some(decl) => match ast.node(decl) {
                // Static access through the type name itself.
                Node::Decl(Decl::Class(c)) => Ok(boxed(registry, &c.qualified_name())),
                // A field or local: its declared type.
                Node::Decl(Decl::Var(v)) => Ok(boxed(registry, &v.declared_type)),
                // A call bound to a source declaration: its return type.
                Node::Decl(Decl::Method(m)) => Ok(boxed(registry, &m.return_type)),
                // A creation expression: its computed type, falling back
                // through the override map.
                Node::Expr(Expr::New(_)) => Ok(normalize(registry, self.owner_of_new(ast, decl))),
                // A nested call: its attributed return type.
                Node::Expr(Expr::Call(c)) => {
                    let ty = c
                        .resolved
                        .as_ref()
                        .map(|r| r.return_type.clone())
                        .or_else(|| ast.ty(decl).cloned())
                        .unwrap_or(TypeHandle::Any);
                    Ok(normalize(registry, ty))
                }
                _ => Err(EngineError::UnsupportedShape {
                    shape: format!("owner declaration of `{}`", ast.selector_text(receiver)),
                    span: ast.span(receiver),
                }),
            },
            // The symbol is not tied to any source declaration (e.g. the
            // result of a call whose signature was fixed up earlier):
            // read the type directly off the already-attributed node.
            None => match ast.expr(receiver) {
                Some(Expr::Call(_)) => {
                    let ty = host
                        .resolve_type(ast, receiver_path)
                        .unwrap_or(TypeHandle::Any);
                    Ok(normalize(registry, ty))
                }
                Some(Expr::New(n)) => {
                    let mut ty = self.owner_of_new(ast, receiver);
                    if ty.is_any() {
                        // Last resort: the attributed constructor
                        // signature knows its owner.
                        if let Some(ctor) = &n.ctor {
                            ty = ctor.owner.clone();
                        }
                    }
                    Ok(normalize(registry, ty))
                }
                _ => Err(EngineError::UnsupportedShape {
                    shape: format!("receiver `{}`", ast.selector_text(receiver)),
                    span: ast.span(receiver),
                }),
            },
        }
    }
}

/// Owner type for a bare-identifier call: the implicit receiver is the
/// nearest enclosing class.
fn owner_from_identifier(ast: &Ast, path: &Path) -> Result<TypeHandle, EngineError> {
    let class_path = path
        .enclosing_class(ast)
        .ok_or(EngineError::NotEnclosedInType {
            span: ast.span(path.leaf()),
        })?;
    match ast.decl(class_path.leaf()) {
        Some(Decl::Class(c)) => Ok(TypeHandle::named(c.qualified_name())),
        _ => unreachable!("enclosing_class returns class declarations only"),
    }
}

/// The nearest enclosing class as a path, as a hard error when absent.
pub fn enclosing_class_path(ast: &Ast, path: &Path) -> Result<Path, EngineError> {
    path.enclosing_class(ast).ok_or(EngineError::NotEnclosedInType {
        span: ast.span(path.leaf()),
    })
}

/// The nearest enclosing method as a path, as a hard error when absent.
pub fn enclosing_method_path(ast: &Ast, path: &Path) -> Result<Path, EngineError> {
    path.enclosing_method(ast)
        .ok_or(EngineError::NotEnclosedInMethod {
            span: ast.span(path.leaf()),
        })
}

/// Box a name through the registry, mapping unboxable (`<any>`) to the
/// sentinel handle.
fn boxed(registry: &TypeRegistry, name: &str) -> TypeHandle {
    match registry.boxed_name(name) {
        Some(boxed) => TypeHandle::named(boxed),
        None => TypeHandle::Any,
    }
}

/// Normalize an already-resolved handle through the boxing table.
fn normalize(registry: &TypeRegistry, ty: TypeHandle) -> TypeHandle {
    boxed(registry, ty.qualified_name())
}
