//! Expression node types.
//!
//! This module defines the closed variant set stored in the arena, together
//! with the structural equality and hashing contract the canonicalization
//! table relies on.

use std::hash::{Hash, Hasher};
use std::mem;

use smallvec::SmallVec;

use crate::handle::ExprHandle;

/// Unique identifier for an interned variable name.
pub type SymbolId = u32;

/// An expression node stored in the arena.
///
/// Child expressions are referenced by handle, so a node is shallow: deep
/// structural equality of two subtrees reduces to equality of nodes built
/// over canonical children. The variant set is closed, which is what makes
/// an "unsupported expression" condition unrepresentable rather than a
/// runtime error.
#[derive(Clone, Copy, Debug)]
pub enum ExprNode {
    /// A floating-point literal.
    Const(f64),

    /// A reference to a bound name.
    Var(SymbolId),

    /// Addition of two operands.
    Add(ExprHandle, ExprHandle),

    /// Subtraction of two operands.
    Sub(ExprHandle, ExprHandle),

    /// A lexical binding: `name` is visible in `body` only.
    Let {
        /// The bound name.
        name: SymbolId,
        /// The expression the name is bound to.
        bound: ExprHandle,
        /// The expression evaluated under the binding.
        body: ExprHandle,
    },
}

// Hand-written equality and hashing because of the f64 payload. Constants
// compare by bit pattern, which keeps the table total over NaN and signed
// zero and preserves the law `a == b` implies `hash(a) == hash(b)`.
impl PartialEq for ExprNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExprNode::Const(a), ExprNode::Const(b)) => a.to_bits() == b.to_bits(),
            (ExprNode::Var(a), ExprNode::Var(b)) => a == b,
            (ExprNode::Add(al, ar), ExprNode::Add(bl, br))
            | (ExprNode::Sub(al, ar), ExprNode::Sub(bl, br)) => al == bl && ar == br,
            (
                ExprNode::Let {
                    name: an,
                    bound: ab,
                    body: ay,
                },
                ExprNode::Let {
                    name: bn,
                    bound: bb,
                    body: by,
                },
            ) => an == bn && ab == bb && ay == by,
            _ => false,
        }
    }
}

impl Eq for ExprNode {}

impl Hash for ExprNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            ExprNode::Const(v) => v.to_bits().hash(state),
            ExprNode::Var(name) => name.hash(state),
            ExprNode::Add(l, r) | ExprNode::Sub(l, r) => {
                l.hash(state);
                r.hash(state);
            }
            ExprNode::Let { name, bound, body } => {
                name.hash(state);
                bound.hash(state);
                body.hash(state);
            }
        }
    }
}

impl ExprNode {
    /// Returns true if this node has no child expressions.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(self, ExprNode::Const(_) | ExprNode::Var(_))
    }

    /// Returns the child handles of this node, in evaluation order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 2]> {
        match self {
            ExprNode::Const(_) | ExprNode::Var(_) => SmallVec::new(),
            ExprNode::Add(l, r) | ExprNode::Sub(l, r) => smallvec::smallvec![*l, *r],
            ExprNode::Let { bound, body, .. } => smallvec::smallvec![*bound, *body],
        }
    }
}
