//! The engine's error taxonomy.
//!
//! Two kinds of outcome are deliberately NOT errors: an incompatible
//! signature (the matcher answers `false`; an expected result of searching
//! candidate records) and an undetermined type (the `<any>` sentinel
//! propagates as a value). Everything in [`EngineError`] is a hard
//! failure: it aborts processing of the current call site and bubbles to
//! the driver, which owns user-facing reporting. Hard failures are never
//! folded into "no match" -- that would hide real authoring errors.

use std::fmt;

use defarg_ast::AttributeError;
use defarg_common::Span;

/// A hard failure while resolving, matching, or rewriting one call site.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// An expression shape outside the enumerated set the resolver and
    /// invocable layer support. Always fatal for the call site: guessing
    /// an owner type could silently corrupt an unrelated rewrite.
    UnsupportedShape { shape: String, span: Span },
    /// A bare-identifier call with no enclosing class declaration.
    NotEnclosedInType { span: Span },
    /// An operation needed the nearest enclosing method and found none.
    NotEnclosedInMethod { span: Span },
    /// Attempt to set a constructor's return type to anything other than
    /// its owner type. Caller programming error.
    ConstructorReturnType {
        got: String,
        owner: String,
        span: Span,
    },
    /// Attempt to set declared thrown types on a creation call, which
    /// does not support declared-exception rewriting.
    ThrownTypesUnsupported { span: Span },
    /// A type name that resolves to neither a primitive nor a declared
    /// symbol.
    UnresolvedType { name: String },
    /// A parameter carries a default but its declared type is not one the
    /// default-value coercion supports.
    UnsupportedDefaultType { type_name: String },
    /// Default-value text that does not parse as its declared type.
    MalformedDefault { text: String, type_name: String },
    /// The host's attribution service failed over a subtree.
    Attribute(AttributeError),
}

impl EngineError {
    /// The primary source span of the failure, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            EngineError::UnsupportedShape { span, .. }
            | EngineError::NotEnclosedInType { span }
            | EngineError::NotEnclosedInMethod { span }
            | EngineError::ConstructorReturnType { span, .. }
            | EngineError::ThrownTypesUnsupported { span } => Some(*span),
            EngineError::UnresolvedType { .. }
            | EngineError::UnsupportedDefaultType { .. }
            | EngineError::MalformedDefault { .. }
            | EngineError::Attribute(_) => None,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnsupportedShape { shape, .. } => {
                write!(f, "unsupported expression shape: {shape}")
            }
            EngineError::NotEnclosedInType { .. } => {
                write!(f, "expression is not enclosed in a type declaration")
            }
            EngineError::NotEnclosedInMethod { .. } => {
                write!(f, "expression is not enclosed in a method declaration")
            }
            EngineError::ConstructorReturnType { got, owner, .. } => {
                write!(
                    f,
                    "cannot set return type of constructor to anything other than \
                     the owner type: got {got}, owner is {owner}"
                )
            }
            EngineError::ThrownTypesUnsupported { .. } => {
                write!(f, "creation calls do not support declared thrown types")
            }
            EngineError::UnresolvedType { name } => {
                write!(f, "cannot resolve type for {name}")
            }
            EngineError::UnsupportedDefaultType { type_name } => {
                write!(f, "unsupported default value type: {type_name}")
            }
            EngineError::MalformedDefault { text, type_name } => {
                write!(f, "default value {text:?} does not parse as {type_name}")
            }
            EngineError::Attribute(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Attribute(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AttributeError> for EngineError {
    fn from(err: AttributeError) -> Self {
        EngineError::Attribute(err)
    }
}
