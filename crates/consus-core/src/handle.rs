//! Type-safe expression handles.
//!
//! Handles are 32-bit indices into the arena, a lightweight alternative to
//! pointers. For nodes produced by the canonicalization pass, handle
//! equality coincides with structural equality.

use std::fmt;

/// A handle to an expression stored in an [`ExprArena`](crate::ExprArena).
///
/// Handles can be copied freely and are meaningful only together with the
/// arena that issued them. Among canonical nodes, two handles are equal if
/// and only if the expressions they refer to are structurally equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Creates a handle from a raw arena index.
    ///
    /// Primarily for internal use by the arena.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
