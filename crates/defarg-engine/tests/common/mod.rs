//! Shared test support: an in-memory host compiler double and tree
//! builders for the standard fixture (a `net.Client` class with a
//! defaulted `connect` method, and an `app.Main` class whose method body
//! the tests drop call sites into).

// Each integration test binary compiles this module separately and uses
// a different subset of it.
#![allow(dead_code)]

use defarg_ast::{
    Ast, AttributeError, CallExpr, ClassDecl, Decl, DefaultSpec, Expr, FieldAccess, Host, Ident,
    LitValue, LiteralExpr, MethodDecl, NewExpr, NodeId, ParamDecl, ParamInfo, Path, Primitive,
    ResolvedMethod, TypeHandle, VarDecl,
};
use defarg_common::Span;
use defarg_engine::{OwnerResolver, RewriteCtx, SignatureRecord, TypeRegistry};
use rustc_hash::{FxHashMap, FxHashSet};

// ── Expression builders ────────────────────────────────────────────────

pub fn ident(ast: &mut Ast, name: &str) -> NodeId {
    ast.alloc_expr(Expr::Ident(Ident { name: name.into() }), Span::synthetic())
}

pub fn lit_str(ast: &mut Ast, value: &str) -> NodeId {
    ast.alloc_expr(
        Expr::Literal(LiteralExpr {
            value: LitValue::Str(value.into()),
        }),
        Span::synthetic(),
    )
}

pub fn lit_int(ast: &mut Ast, value: i32) -> NodeId {
    ast.alloc_expr(
        Expr::Literal(LiteralExpr {
            value: LitValue::Int(value),
        }),
        Span::synthetic(),
    )
}

pub fn field_access(ast: &mut Ast, receiver: NodeId, name: &str) -> NodeId {
    ast.alloc_expr(
        Expr::FieldAccess(FieldAccess {
            receiver,
            name: name.into(),
        }),
        Span::synthetic(),
    )
}

pub fn call(ast: &mut Ast, select: NodeId, args: Vec<NodeId>) -> NodeId {
    ast.alloc_expr(
        Expr::Call(CallExpr {
            select,
            args,
            resolved: None,
        }),
        Span::synthetic(),
    )
}

/// `receiver.name(args)` in one step.
pub fn method_call(ast: &mut Ast, receiver: NodeId, name: &str, args: Vec<NodeId>) -> NodeId {
    let select = field_access(ast, receiver, name);
    call(ast, select, args)
}

pub fn new_of(ast: &mut Ast, type_name: &str, args: Vec<NodeId>) -> NodeId {
    let type_ident = ident(ast, type_name);
    ast.alloc_expr(
        Expr::New(NewExpr {
            type_ident,
            args,
            ctor: None,
        }),
        Span::synthetic(),
    )
}

pub fn param(name: &str, type_name: &str) -> ParamDecl {
    ParamDecl {
        name: name.into(),
        type_name: type_name.into(),
        default: None,
    }
}

pub fn param_default(name: &str, type_name: &str, text: &str) -> ParamDecl {
    ParamDecl {
        name: name.into(),
        type_name: type_name.into(),
        default: Some(DefaultSpec::Text(text.into())),
    }
}

pub fn method(ast: &mut Ast, name: &str, params: Vec<ParamDecl>, return_type: &str) -> NodeId {
    ast.alloc_decl(
        Decl::Method(MethodDecl {
            name: name.into(),
            params,
            return_type: return_type.into(),
            body: Vec::new(),
        }),
        Span::synthetic(),
    )
}

pub fn class(ast: &mut Ast, package: &str, name: &str, members: Vec<NodeId>) -> NodeId {
    ast.alloc_decl(
        Decl::Class(ClassDecl {
            name: name.into(),
            package: package.into(),
            members,
        }),
        Span::synthetic(),
    )
}

// ── MiniHost ───────────────────────────────────────────────────────────

/// A deterministic in-memory stand-in for the surrounding compiler.
///
/// Knows the `java.lang` wrapper types, resolves identifiers against the
/// registered class declarations and enclosing-scope variable
/// declarations, and attributes expressions bottom-up. Creation calls
/// listed in `stubborn_news` simulate the host quirk the override map
/// exists for: their identifier never receives a type, no matter how
/// often attribution runs.
#[derive(Default)]
pub struct MiniHost {
    known_types: FxHashSet<String>,
    classes: FxHashMap<String, NodeId>,
    simple_names: FxHashMap<String, String>,
    stubborn_news: FxHashSet<NodeId>,
    /// Order in which nodes were attributed, for fix-up ordering tests.
    pub attributed: Vec<NodeId>,
}

impl MiniHost {
    pub fn new() -> MiniHost {
        let mut host = MiniHost::default();
        for name in [
            "java.lang.Object",
            "java.lang.String",
            "java.lang.Integer",
            "java.lang.Long",
            "java.lang.Short",
            "java.lang.Byte",
            "java.lang.Character",
            "java.lang.Float",
            "java.lang.Double",
            "java.lang.Boolean",
            "java.lang.Void",
            "java.lang.Exception",
        ] {
            host.known_types.insert(name.to_string());
        }
        host
    }

    pub fn register_class(&mut self, ast: &Ast, class: NodeId) {
        if let Some(Decl::Class(c)) = ast.decl(class) {
            self.classes.insert(c.qualified_name(), class);
            self.simple_names.insert(c.name.clone(), c.qualified_name());
        }
    }

    /// Mark a creation call whose identifier attribution never sticks.
    pub fn mark_stubborn(&mut self, node: NodeId) {
        self.stubborn_news.insert(node);
    }

    fn resolve_class_name<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.classes.contains_key(name) {
            return Some(name);
        }
        self.simple_names.get(name).map(String::as_str)
    }

    fn type_handle(name: &str) -> TypeHandle {
        match Primitive::from_name(name) {
            Some(p) => TypeHandle::Primitive(p),
            None => TypeHandle::named(name),
        }
    }

    fn lookup_ident(&self, ast: &Ast, path: &Path, name: &str) -> Option<NodeId> {
        for ancestor in path.outward() {
            match ast.decl(ancestor) {
                Some(Decl::Method(m)) => {
                    for stmt in &m.body {
                        if let Some(Decl::Var(v)) = ast.decl(*stmt) {
                            if v.name == name {
                                return Some(*stmt);
                            }
                        }
                    }
                }
                Some(Decl::Class(c)) => {
                    for member in &c.members {
                        if let Some(Decl::Var(v)) = ast.decl(*member) {
                            if v.name == name {
                                return Some(*member);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        // A type name used as a static-access receiver.
        self.resolve_class_name(name)
            .and_then(|fqn| self.classes.get(fqn))
            .copied()
    }

    fn class_method(&self, ast: &Ast, owner: &str, name: &str) -> Option<NodeId> {
        let class = self.classes.get(self.resolve_class_name(owner)?)?;
        if let Some(Decl::Class(c)) = ast.decl(*class) {
            for member in &c.members {
                if let Some(Decl::Method(m)) = ast.decl(*member) {
                    if m.name == name {
                        return Some(*member);
                    }
                }
            }
        }
        None
    }

    fn attr(&mut self, ast: &mut Ast, node: NodeId, scope: &Path) -> Result<(), AttributeError> {
        self.attributed.push(node);
        let expr = match ast.expr(node) {
            Some(e) => e.clone(),
            None => return Ok(()),
        };
        match expr {
            Expr::Literal(l) => {
                let ty = match l.value {
                    LitValue::Str(_) => TypeHandle::named("java.lang.String"),
                    LitValue::Int(_) => TypeHandle::Primitive(Primitive::Int),
                    LitValue::Long(_) => TypeHandle::Primitive(Primitive::Long),
                    LitValue::Float(_) => TypeHandle::Primitive(Primitive::Float),
                    LitValue::Double(_) => TypeHandle::Primitive(Primitive::Double),
                    LitValue::Bool(_) => TypeHandle::Primitive(Primitive::Boolean),
                    LitValue::Char(_) => TypeHandle::Primitive(Primitive::Char),
                    LitValue::Null => TypeHandle::Any,
                };
                ast.set_ty(node, ty);
            }
            Expr::Ident(i) => {
                if let Some(decl) = self.lookup_ident(ast, scope, &i.name) {
                    match ast.decl(decl) {
                        Some(Decl::Var(v)) => {
                            let ty = Self::type_handle(&v.declared_type);
                            ast.set_ty(node, ty);
                        }
                        Some(Decl::Class(c)) => {
                            let ty = TypeHandle::named(c.qualified_name());
                            ast.set_ty(node, ty);
                        }
                        _ => {}
                    }
                }
            }
            Expr::FieldAccess(fa) => {
                self.attr(ast, fa.receiver, scope)?;
            }
            Expr::Call(c) => {
                if let Some(Expr::FieldAccess(fa)) = ast.expr(c.select).cloned() {
                    self.attr(ast, fa.receiver, scope)?;
                }
                for arg in &c.args {
                    self.attr(ast, *arg, scope)?;
                }
                let (owner, name) = match ast.expr(c.select) {
                    Some(Expr::FieldAccess(fa)) => (
                        ast.ty(fa.receiver).cloned().unwrap_or(TypeHandle::Any),
                        fa.name.clone(),
                    ),
                    Some(Expr::Ident(i)) => {
                        let owner = scope
                            .enclosing_class(ast)
                            .and_then(|p| match ast.decl(p.leaf()) {
                                Some(Decl::Class(cl)) => {
                                    Some(TypeHandle::named(cl.qualified_name()))
                                }
                                _ => None,
                            })
                            .unwrap_or(TypeHandle::Any);
                        (owner, i.name.clone())
                    }
                    _ => (TypeHandle::Any, String::new()),
                };
                if let TypeHandle::Named(owner_name) = &owner {
                    if let Some(method_id) = self.class_method(ast, owner_name, &name) {
                        let return_type = match ast.decl(method_id) {
                            Some(Decl::Method(m)) => Self::type_handle(&m.return_type),
                            _ => TypeHandle::Any,
                        };
                        if let Some(Expr::Call(call)) = ast.expr_mut(node) {
                            call.resolved = Some(ResolvedMethod {
                                owner: owner.clone(),
                                return_type: return_type.clone(),
                                thrown: Vec::new(),
                            });
                        }
                        ast.set_ty(node, return_type);
                    }
                }
            }
            Expr::New(n) => {
                for arg in &n.args {
                    self.attr(ast, *arg, scope)?;
                }
                if self.stubborn_news.contains(&node) {
                    return Ok(());
                }
                let name = match ast.expr(n.type_ident) {
                    Some(Expr::Ident(i)) => i.name.clone(),
                    _ => String::new(),
                };
                let fqn = self
                    .resolve_class_name(&name)
                    .map(str::to_string)
                    .or_else(|| self.known_types.get(&name).cloned())
                    .ok_or_else(|| AttributeError {
                        node,
                        message: format!("unknown type {name}"),
                    })?;
                ast.set_ty(n.type_ident, TypeHandle::named(fqn.clone()));
                if let Some(Expr::New(new)) = ast.expr_mut(node) {
                    if new.ctor.is_none() {
                        new.ctor = Some(ResolvedMethod {
                            owner: TypeHandle::named(fqn.clone()),
                            return_type: TypeHandle::Primitive(Primitive::Void),
                            thrown: Vec::new(),
                        });
                    }
                }
                ast.set_ty(node, TypeHandle::named(fqn));
            }
        }
        Ok(())
    }
}

impl Host for MiniHost {
    fn resolve_type(&self, ast: &Ast, path: &Path) -> Option<TypeHandle> {
        ast.ty(path.leaf()).cloned()
    }

    fn attribute(
        &mut self,
        ast: &mut Ast,
        node: NodeId,
        scope: &Path,
    ) -> Result<(), AttributeError> {
        self.attr(ast, node, scope)
    }

    fn find_declaration(&self, ast: &Ast, path: &Path, node: NodeId) -> Option<NodeId> {
        match ast.expr(node)? {
            Expr::Ident(i) => self.lookup_ident(ast, path, &i.name),
            // A creation expression is its own defining node.
            Expr::New(_) => Some(node),
            Expr::Call(c) => {
                let resolved = c.resolved.as_ref()?;
                let name = ast.selector_text(c.select);
                let simple = name.rsplit('.').next().unwrap_or(&name);
                self.class_method(ast, resolved.owner.qualified_name(), simple)
            }
            _ => None,
        }
    }

    fn enumerate_parameters(&self, ast: &Ast, method: NodeId) -> Vec<ParamInfo> {
        match ast.decl(method) {
            Some(Decl::Method(m)) => m
                .params
                .iter()
                .map(|p| ParamInfo {
                    type_name: p.type_name.clone(),
                    default: p.default.clone(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn find_type(&self, name: &str) -> Option<TypeHandle> {
        if self.known_types.contains(name) || self.classes.contains_key(name) {
            Some(TypeHandle::named(name))
        } else {
            None
        }
    }
}

// ── Standard fixture ───────────────────────────────────────────────────

/// The standard two-class world:
///
/// ```text
/// package net;
/// public class Client {
///     Client() {}
///     public void connect(String host, @DefaultValue("80") int port) {}
///     public int port() {}
///     public Client make() {}
/// }
///
/// package app;
/// public class Main {
///     void main() { /* tests append statements here */ }
/// }
/// ```
pub struct Fixture {
    pub ast: Ast,
    pub host: MiniHost,
    pub registry: TypeRegistry,
    pub resolver: OwnerResolver,
    pub client_class: NodeId,
    pub connect_method: NodeId,
    pub ctor_method: NodeId,
    pub main_class: NodeId,
    pub main_method: NodeId,
}

impl Fixture {
    pub fn new() -> Fixture {
        let mut ast = Ast::new();

        let ctor_method = method(&mut ast, "<init>", Vec::new(), "void");
        let connect_method = method(
            &mut ast,
            "connect",
            vec![
                param("host", "java.lang.String"),
                param_default("port", "int", "80"),
            ],
            "void",
        );
        let port_method = method(&mut ast, "port", Vec::new(), "int");
        let make_method = method(&mut ast, "make", Vec::new(), "net.Client");
        let client_class = class(
            &mut ast,
            "net",
            "Client",
            vec![ctor_method, connect_method, port_method, make_method],
        );

        let main_method = method(&mut ast, "main", Vec::new(), "void");
        let main_class = class(&mut ast, "app", "Main", vec![main_method]);

        let mut host = MiniHost::new();
        host.register_class(&ast, client_class);
        host.register_class(&ast, main_class);

        Fixture {
            ast,
            host,
            registry: TypeRegistry::new(),
            resolver: OwnerResolver::new(),
            client_class,
            connect_method,
            ctor_method,
            main_class,
            main_method,
        }
    }

    /// Borrow everything as a rewrite context.
    pub fn cx(&mut self) -> RewriteCtx<'_> {
        RewriteCtx::new(
            &mut self.ast,
            &mut self.host,
            &self.registry,
            &mut self.resolver,
        )
    }

    /// Append a statement to `Main.main` and return its path.
    pub fn add_stmt(&mut self, node: NodeId) -> Path {
        if let Some(Decl::Method(m)) = self.ast.decl_mut(self.main_method) {
            m.body.push(node);
        }
        Path::root(self.main_class)
            .descend(self.main_method)
            .descend(node)
    }

    /// Declare a local variable in `Main.main`.
    pub fn declare_local(&mut self, name: &str, declared_type: &str) -> NodeId {
        let decl = self.ast.alloc_decl(
            Decl::Var(VarDecl {
                name: name.into(),
                declared_type: declared_type.into(),
                init: None,
            }),
            Span::synthetic(),
        );
        self.add_stmt(decl);
        decl
    }

    /// The signature record for `net.Client.connect(String, int=80)`.
    pub fn connect_record(&self) -> SignatureRecord {
        let path = Path::root(self.client_class).descend(self.connect_method);
        SignatureRecord::from_method(&self.ast, &self.host, &path).expect("connect record")
    }
}

/// Render a call for inspection: selector text plus each argument's
/// literal value (or selector text) in order.
pub fn render_call(ast: &Ast, call: NodeId) -> String {
    let (select, args) = match ast.expr(call) {
        Some(Expr::Call(c)) => (ast.selector_text(c.select), c.args.clone()),
        Some(Expr::New(n)) => (format!("new {}", ast.selector_text(n.type_ident)), n.args.clone()),
        _ => return ast.selector_text(call),
    };
    let rendered: Vec<String> = args
        .iter()
        .map(|arg| match ast.expr(*arg) {
            Some(Expr::Literal(l)) => l.value.to_string(),
            _ => ast.selector_text(*arg),
        })
        .collect();
    format!("{}({})", select, rendered.join(", "))
}
