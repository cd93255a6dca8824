//! Default-argument completion engine.
//!
//! Augments a statically typed object language that has no native
//! optional/default call arguments: call sites that omit trailing
//! arguments are completed with the defaults declared on the callable,
//! in place, before the compiler's checking phase finalizes the program.
//!
//! The engine is AST-level and single-threaded. The surrounding compiler
//! is consumed as a capability interface ([`defarg_ast::Host`]); the
//! traversal driver that discovers call sites, the annotation surface
//! that declares defaults, and user-facing diagnostics all live outside.
//!
//! # Architecture
//!
//! - [`registry`]: canonical type lookup and the boxing table.
//! - [`resolve`]: owner/receiver type resolution with per-run caches and
//!   the creation-call owner override map.
//! - [`invocable`]: the uniform view over plain calls and creation calls.
//! - [`signature`]: immutable signature records and call-site matching.
//! - [`rewrite`]: argument completion and bottom-up re-attribution.
//! - [`error`]: the hard-failure taxonomy.
//! - [`diagnostics`]: ariadne rendering for driver-side reporting.

pub mod diagnostics;
pub mod error;
pub mod invocable;
pub mod registry;
pub mod resolve;
pub mod rewrite;
pub mod signature;

use defarg_ast::{Ast, Host, Path};

pub use error::EngineError;
pub use invocable::{Invocable, CONSTRUCTOR_NAME};
pub use registry::TypeRegistry;
pub use resolve::OwnerResolver;
pub use signature::{DefaultValue, PlannedArg, SignatureRecord};

/// Shared mutable state for processing call sites within one compilation
/// run.
///
/// Construct one per run: the resolver's caches and override map must
/// start empty each run. The borrowed host provides the external
/// compiler services; the tree is mutated in place by the rewrite pass
/// and by host attribution, from this single thread of control.
pub struct RewriteCtx<'a> {
    pub ast: &'a mut Ast,
    pub host: &'a mut dyn Host,
    pub registry: &'a TypeRegistry,
    pub resolver: &'a mut OwnerResolver,
}

impl<'a> RewriteCtx<'a> {
    pub fn new(
        ast: &'a mut Ast,
        host: &'a mut dyn Host,
        registry: &'a TypeRegistry,
        resolver: &'a mut OwnerResolver,
    ) -> RewriteCtx<'a> {
        RewriteCtx {
            ast,
            host,
            registry,
            resolver,
        }
    }
}

/// Process one call site against one candidate signature record: wrap it
/// in the uniform invocable view, match, and complete the argument list
/// when the record applies. Returns whether the tree changed.
///
/// This is the per-call-site entry point the external traversal driver
/// invokes. Matching failures answer `Ok(false)`; hard failures abort
/// this call site only and bubble up.
pub fn process_call_site(
    cx: &mut RewriteCtx<'_>,
    record: &SignatureRecord,
    path: &Path,
) -> Result<bool, EngineError> {
    let inv = Invocable::wrap(cx, path.leaf(), path.clone())?;
    if !record.matches(cx, &inv)? {
        return Ok(false);
    }
    rewrite::apply(cx, record, &inv)
}
