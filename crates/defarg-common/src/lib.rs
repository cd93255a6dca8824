//! Shared leaf types for the defarg rewriting toolchain.
//!
//! Currently this is just source spans and the line index used to turn
//! byte offsets into human-readable positions for diagnostics.

pub mod span;

pub use span::{LineIndex, Span};
