//! Callable signature records and call-site matching.
//!
//! A [`SignatureRecord`] is an immutable snapshot of one declared
//! callable: name, owner, return type, parameter types, and the sparse
//! index-to-default map. Records are built once when the declaration is
//! first encountered and never mutated.
//!
//! Matching decides whether a record applies to a call site and, via
//! [`SignatureRecord::completion`], how to complete the argument list.
//! An incompatible record is an expected outcome of the candidate search
//! and answers `false`; only genuinely broken inputs (unsupported
//! shapes, unresolvable types) are errors.

use std::fmt;

use defarg_ast::{Ast, Decl, DefaultSpec, Host, LitValue, Path};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::EngineError;
use crate::invocable::Invocable;
use crate::resolve::enclosing_class_path;
use crate::RewriteCtx;

/// A registered default for one parameter position.
///
/// `Null` is the distinguished "default is null" marker -- distinct from
/// "no default", which is the position being absent from the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DefaultValue {
    /// The null/empty value of the parameter's declared type.
    Null,
    /// A literal, already coerced to the parameter's declared type.
    Lit(LitValue),
}

/// An immutable snapshot of a declared callable's shape plus its
/// parameter defaults.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureRecord {
    name: String,
    owner: String,
    return_type: String,
    param_types: Vec<String>,
    defaults: FxHashMap<usize, DefaultValue>,
}

/// One entry of an argument-completion plan: which position to fill,
/// with what declared type, with which default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedArg {
    pub index: usize,
    pub type_name: String,
    pub value: DefaultValue,
}

impl SignatureRecord {
    /// Assemble a record directly from its parts.
    ///
    /// [`SignatureRecord::from_method`] is the usual path; this exists
    /// for drivers that keep records outside the tree. Default indices
    /// outside `[0, param_types.len())` would make the record
    /// inapplicable everywhere, so they are rejected by debug assertion.
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        return_type: impl Into<String>,
        param_types: Vec<String>,
        defaults: impl IntoIterator<Item = (usize, DefaultValue)>,
    ) -> SignatureRecord {
        let defaults: FxHashMap<usize, DefaultValue> = defaults.into_iter().collect();
        let record = SignatureRecord {
            name: name.into(),
            owner: owner.into(),
            return_type: return_type.into(),
            param_types,
            defaults,
        };
        debug_assert!(
            record.defaults.keys().all(|&i| i < record.param_types.len()),
            "default index out of parameter range"
        );
        record
    }

    /// Snapshot a callable declaration.
    ///
    /// The owner is the nearest enclosing class of the declaration;
    /// parameters and their default annotations come from the host's
    /// enumeration service. Default-value text is coerced per the
    /// parameter's declared type here, once, so matching and rewriting
    /// never re-parse.
    pub fn from_method(
        ast: &Ast,
        host: &dyn Host,
        method_path: &Path,
    ) -> Result<SignatureRecord, EngineError> {
        let method_id = method_path.leaf();
        let method = match ast.decl(method_id) {
            Some(Decl::Method(m)) => m,
            _ => {
                return Err(EngineError::UnsupportedShape {
                    shape: "signature record source must be a method declaration".into(),
                    span: ast.span(method_id),
                })
            }
        };
        let class_path = enclosing_class_path(ast, method_path)?;
        let owner = match ast.decl(class_path.leaf()) {
            Some(Decl::Class(c)) => c.qualified_name(),
            _ => unreachable!("enclosing_class returns class declarations only"),
        };

        let params = host.enumerate_parameters(ast, method_id);
        let mut param_types = Vec::with_capacity(params.len());
        let mut defaults = FxHashMap::default();
        for (index, param) in params.into_iter().enumerate() {
            if let Some(spec) = &param.default {
                defaults.insert(index, coerce_default(&param.type_name, spec)?);
            }
            param_types.push(param.type_name);
        }

        Ok(SignatureRecord {
            name: method.name.clone(),
            owner,
            return_type: method.return_type.clone(),
            param_types,
            defaults,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }

    /// The registered default at a position, if any.
    pub fn default_at(&self, index: usize) -> Option<&DefaultValue> {
        self.defaults.get(&index)
    }

    /// Does this record apply to the given call site?
    ///
    /// Owner and argument types degrade gracefully: an undetermined
    /// (`<any>`) owner is unconstrained, an unattributed argument is a
    /// wildcard that matches any declared parameter type. Return types
    /// are NOT compared: overload sets differing only by return type are
    /// not disambiguated (known limitation).
    pub fn matches(&self, cx: &mut RewriteCtx<'_>, inv: &Invocable) -> Result<bool, EngineError> {
        if inv.self_name(cx.ast) != self.name {
            return Ok(false);
        }

        // An absent receiver (implicit this) and an undetermined owner
        // both leave the owner unconstrained; matching degrades
        // gracefully rather than rejecting.
        if inv.has_explicit_receiver(cx.ast) {
            let owner = inv.owner_type_qualified_name(cx)?;
            if let Some(found) = cx.registry.boxed_name(&owner) {
                match cx.registry.boxed_name(&self.owner) {
                    Some(declared) if declared != found => return Ok(false),
                    _ => {}
                }
            }
        }

        let args = inv.arguments(cx.ast);
        if args.len() > self.param_types.len() {
            return Ok(false);
        }
        for (arg, param) in args.iter().zip(&self.param_types) {
            // An argument whose type attribution has not produced yet is
            // a wildcard: it matches at this position, never mismatches.
            let arg_ty = match cx.ast.ty(*arg) {
                Some(ty) => ty,
                None => continue,
            };
            let found = match cx.registry.normalize(arg_ty) {
                Some(name) => name,
                None => continue,
            };
            match cx.registry.boxed_name(param) {
                Some(declared) if declared == found => {}
                Some(_) => return Ok(false),
                None => {}
            }
        }

        // Applicable only if every position beyond the supplied count has
        // a registered default; otherwise the record is incompatible with
        // this call site and simply does not match.
        Ok(self.completion(args.len()).is_some())
    }

    /// The argument-completion plan for a call supplying `supplied`
    /// arguments: one entry per missing position, in index order. `None`
    /// when some missing position has no registered default (the record
    /// is incompatible with the call site).
    pub fn completion(&self, supplied: usize) -> Option<Vec<PlannedArg>> {
        let mut plan = Vec::new();
        for index in supplied..self.param_types.len() {
            let value = self.defaults.get(&index)?.clone();
            plan.push(PlannedArg {
                index,
                type_name: self.param_types[index].clone(),
                value,
            });
        }
        Some(plan)
    }
}

impl fmt::Display for SignatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.owner, self.name, self.param_types.join(", "))
    }
}

/// Coerce default-value annotation text to the parameter's declared
/// type. Only the literal-capable types are supported; anything else is
/// a hard error when the record is built, not at rewrite time.
fn coerce_default(type_name: &str, spec: &DefaultSpec) -> Result<DefaultValue, EngineError> {
    let text = match spec {
        DefaultSpec::Null => return Ok(DefaultValue::Null),
        DefaultSpec::Text(text) => text,
    };
    let malformed = || EngineError::MalformedDefault {
        text: text.clone(),
        type_name: type_name.to_string(),
    };
    let value = match type_name {
        "java.lang.String" => LitValue::Str(text.clone()),
        "java.lang.Integer" | "int" => LitValue::Int(text.parse().map_err(|_| malformed())?),
        "java.lang.Long" | "long" => LitValue::Long(text.parse().map_err(|_| malformed())?),
        "java.lang.Float" | "float" => LitValue::Float(text.parse().map_err(|_| malformed())?),
        "java.lang.Double" | "double" => LitValue::Double(text.parse().map_err(|_| malformed())?),
        "java.lang.Boolean" | "boolean" => match text.as_str() {
            "true" => LitValue::Bool(true),
            "false" => LitValue::Bool(false),
            _ => return Err(malformed()),
        },
        _ => {
            return Err(EngineError::UnsupportedDefaultType {
                type_name: type_name.to_string(),
            })
        }
    };
    Ok(DefaultValue::Lit(value))
}
