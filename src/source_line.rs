//! The source line threaded through the interpreter for diagnostics.

/// A 1-based line number in the original program text. Attached to every
/// call frame and to every error object constructed from one.
pub type SourceLine = usize;

/// Sentinel used when no line information is available (e.g. host-constructed
/// objects that never passed through the compiler).
pub const UNKNOWN_LINE: SourceLine = 0;
