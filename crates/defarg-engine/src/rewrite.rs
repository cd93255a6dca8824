//! The rewrite + re-attribution pass.
//!
//! Applies an argument-completion plan to a matched call site, then
//! repairs type information in the affected subtree: nested calls are
//! re-attributed innermost-first, so an enclosing call's overload
//! selection observes the corrected types of its argument calls, and the
//! rewritten call itself is re-attributed last. A visited set keyed by
//! node identity -- scoped to this one top-level rewrite, not global
//! state -- guards against reprocessing.

use defarg_ast::{Ast, Expr, LitValue, LiteralExpr, NodeId, Path, Primitive};
use defarg_common::Span;
use rustc_hash::FxHashSet;

use crate::error::EngineError;
use crate::invocable::Invocable;
use crate::signature::{DefaultValue, PlannedArg, SignatureRecord};
use crate::RewriteCtx;

/// Complete the invocable's argument list per the record and re-derive
/// affected types. Returns whether the tree changed.
///
/// A call already at full arity is a no-op (`Ok(false)`), which makes the
/// pass idempotent. A record that cannot cover the missing positions also
/// answers `Ok(false)` -- the matcher reports such records as
/// non-matching, so reaching that case here means the caller skipped
/// matching.
pub fn apply(
    cx: &mut RewriteCtx<'_>,
    record: &SignatureRecord,
    inv: &Invocable,
) -> Result<bool, EngineError> {
    let mut args = inv.arguments(cx.ast);
    let plan = match record.completion(args.len()) {
        Some(plan) => plan,
        None => return Ok(false),
    };
    if plan.is_empty() {
        return Ok(false);
    }

    for planned in &plan {
        args.push(synthesize_literal(cx, planned)?);
    }
    inv.set_arguments(cx.ast, args);

    // The compiler never attributed this creation call's identifier:
    // assert the owner we matched on so later resolution sees it.
    if let Invocable::Creation { node, .. } = inv {
        let unattributed = match cx.ast.expr(*node) {
            Some(Expr::New(n)) => cx.ast.ty(n.type_ident).is_none(),
            _ => false,
        };
        if unattributed {
            cx.resolver.add_ctor_owner(*node, record.owner());
        }
    }

    let mut fixed = FxHashSet::default();
    reattribute(cx, inv.node(), inv.path().clone(), &mut fixed)?;
    Ok(true)
}

/// Re-attribute a call-like subtree bottom-up: every nested call not yet
/// processed in this rewrite is corrected first, then the node itself.
fn reattribute(
    cx: &mut RewriteCtx<'_>,
    node: NodeId,
    path: Path,
    fixed: &mut FxHashSet<NodeId>,
) -> Result<(), EngineError> {
    fixed.insert(node);
    for (child, child_path) in call_like_children(cx.ast, node, &path) {
        if !fixed.contains(&child) {
            reattribute(cx, child, child_path, fixed)?;
        }
    }
    cx.host.attribute(cx.ast, node, &path)?;
    Ok(())
}

/// Call-like nodes directly nested in a call's receiver chain and
/// argument list, paired with their paths.
fn call_like_children(ast: &Ast, node: NodeId, path: &Path) -> Vec<(NodeId, Path)> {
    let mut out = Vec::new();
    match ast.expr(node) {
        Some(Expr::Call(c)) => {
            // Receiver chain first: it evaluates before the arguments.
            let mut cur = c.select;
            let mut cur_path = path.descend(c.select);
            while let Some(Expr::FieldAccess(fa)) = ast.expr(cur) {
                let receiver_path = cur_path.descend(fa.receiver);
                if is_call_like(ast, fa.receiver) {
                    out.push((fa.receiver, receiver_path));
                    break;
                }
                cur = fa.receiver;
                cur_path = receiver_path;
            }
            for arg in &c.args {
                if is_call_like(ast, *arg) {
                    out.push((*arg, path.descend(*arg)));
                }
            }
        }
        Some(Expr::New(n)) => {
            for arg in &n.args {
                if is_call_like(ast, *arg) {
                    out.push((*arg, path.descend(*arg)));
                }
            }
        }
        _ => {}
    }
    out
}

fn is_call_like(ast: &Ast, node: NodeId) -> bool {
    matches!(ast.expr(node), Some(Expr::Call(_)) | Some(Expr::New(_)))
}

/// Build a literal argument node for one planned position and give it
/// its declared type up front, so matching and re-attribution see a
/// concrete type immediately.
fn synthesize_literal(cx: &mut RewriteCtx<'_>, planned: &PlannedArg) -> Result<NodeId, EngineError> {
    let value = match &planned.value {
        DefaultValue::Lit(value) => value.clone(),
        DefaultValue::Null => null_literal_for(&planned.type_name),
    };
    let id = cx
        .ast
        .alloc_expr(Expr::Literal(LiteralExpr { value }), Span::synthetic());
    let ty = cx.registry.type_by_name(cx.host, &planned.type_name)?;
    cx.ast.set_ty(id, ty);
    Ok(id)
}

/// The null/empty literal appropriate to a declared type: zero-values
/// for primitives, `null` for reference types.
fn null_literal_for(type_name: &str) -> LitValue {
    match Primitive::from_name(type_name) {
        Some(Primitive::Int) | Some(Primitive::Short) | Some(Primitive::Byte) => LitValue::Int(0),
        Some(Primitive::Long) => LitValue::Long(0),
        Some(Primitive::Float) => LitValue::Float(0.0),
        Some(Primitive::Double) => LitValue::Double(0.0),
        Some(Primitive::Boolean) => LitValue::Bool(false),
        Some(Primitive::Char) => LitValue::Char('\0'),
        Some(Primitive::Void) | None => LitValue::Null,
    }
}
