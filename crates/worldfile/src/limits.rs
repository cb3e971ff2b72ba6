//! Limits guarding decode of untrusted input.

/// Maximum container nesting depth the document parser will recurse into.
///
/// World documents nest four levels deep in practice; the guard only
/// exists so a hostile document cannot overflow the stack.
pub const MAX_DEPTH: usize = 128;
