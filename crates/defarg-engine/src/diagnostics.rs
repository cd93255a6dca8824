//! Ariadne-based diagnostic rendering for engine errors.
//!
//! The engine itself only produces [`EngineError`] values; turning them
//! into user-visible reports is the driver's job, and this module is the
//! rendering half of that: per-variant error codes and a formatted,
//! labeled report against the compilation unit's source text.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use defarg_common::Span;

use crate::error::EngineError;

/// Assign a unique error code to each engine error variant.
pub fn error_code(err: &EngineError) -> &'static str {
    match err {
        EngineError::UnsupportedShape { .. } => "D0001",
        EngineError::NotEnclosedInType { .. } => "D0002",
        EngineError::NotEnclosedInMethod { .. } => "D0003",
        EngineError::ConstructorReturnType { .. } => "D0004",
        EngineError::ThrownTypesUnsupported { .. } => "D0005",
        EngineError::UnresolvedType { .. } => "D0006",
        EngineError::UnsupportedDefaultType { .. } => "D0007",
        EngineError::MalformedDefault { .. } => "D0008",
        EngineError::Attribute(_) => "D0009",
    }
}

/// A short label for the primary span of each variant.
fn label_message(err: &EngineError) -> &'static str {
    match err {
        EngineError::UnsupportedShape { .. } => "this expression shape is not supported",
        EngineError::NotEnclosedInType { .. } => "no enclosing type declaration",
        EngineError::NotEnclosedInMethod { .. } => "no enclosing method declaration",
        EngineError::ConstructorReturnType { .. } => "constructor return type is its owner type",
        EngineError::ThrownTypesUnsupported { .. } => "creation call here",
        EngineError::UnresolvedType { .. } => "type name is not resolvable",
        EngineError::UnsupportedDefaultType { .. } => "default declared here",
        EngineError::MalformedDefault { .. } => "default declared here",
        EngineError::Attribute(_) => "attribution failed here",
    }
}

fn span_to_range(span: Span) -> Range<usize> {
    span.start as usize..span.end as usize
}

/// Render an engine error into a formatted diagnostic string.
///
/// Output is colorless for stable test snapshots. Errors without a span
/// are anchored at the start of the source.
pub fn render_diagnostic(err: &EngineError, source: &str) -> String {
    let config = Config::default().with_color(false);
    let source_len = source.len();

    // Clamp to source bounds; ariadne wants a non-empty span.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s == e {
            s..e.saturating_add(1).min(source_len)
        } else {
            s..e
        }
    };

    let range = clamp(err.span().map(span_to_range).unwrap_or(0..1));

    let report = Report::build(ReportKind::Error, range.clone())
        .with_code(error_code(err))
        .with_message(err.to_string())
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message(label_message(err))
                .with_color(Color::Red),
        )
        .finish();

    let mut buf = Vec::new();
    let cache = Source::from(source);
    report.write(cache, &mut buf).expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}
