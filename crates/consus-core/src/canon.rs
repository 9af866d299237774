//! The hash-consing pass.
//!
//! [`CanonTable::intern`] walks a tree bottom-up and rewrites it so that
//! every distinct sub-structure is represented by exactly one canonical
//! handle. Because children are canonicalized first, a single shallow map
//! lookup per node is enough to recognize a structurally equal subtree,
//! whatever its original object identity.
//!
//! `let` bindings get an explicit lexical scope chain: a binding is pushed
//! when its body is entered and popped when the body is done, so it shadows
//! same-named outer bindings without destroying them and its visibility
//! ends with the `Let` node, independent of how many table insertions the
//! body performed.

use hashbrown::{HashMap, HashSet};

use crate::arena::ExprArena;
use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;

/// Counters reported by one interning call.
///
/// The two counters separate what the classic "hit count" conflates:
/// `reused` is the number of canonicalizations answered by an existing
/// table entry (a genuine structural reuse), `inserted` is the number of
/// fresh canonical nodes. Variable occurrences resolved through the scope
/// chain are bookkeeping and count toward neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InternStats {
    /// Canonicalizations resolved by an existing table entry.
    pub reused: u64,
    /// Fresh canonical nodes inserted into the table.
    pub inserted: u64,
}

impl InternStats {
    /// Total nodes that went through the table.
    #[must_use]
    pub const fn processed(self) -> u64 {
        self.reused + self.inserted
    }
}

/// A scope entry for one `let`-bound name.
///
/// `Some(handle)` substitutes the shared bound expression for occurrences
/// of the name; `None` shadows any outer entry while leaving occurrences
/// symbolic (used when the bound expression has free variables, where
/// substitution could change meaning under rebinding).
type Binding = (SymbolId, Option<ExprHandle>);

/// The canonicalization table.
///
/// Maps node content, over already-canonical children, to the unique
/// canonical handle for that structure. At any point, two canonical
/// handles are equal if and only if their expressions are structurally
/// equal. A table may be reused across interning calls to share structure
/// between separately built trees.
#[derive(Clone, Debug, Default)]
pub struct CanonTable {
    /// Structural map: node content to canonical handle.
    canon: HashMap<ExprNode, ExprHandle>,
    /// Lexical scope chain for `let` bindings, innermost last.
    ///
    /// Empty between top-level interning calls; the returned table never
    /// carries bindings that were only visible inside some `Let`.
    bindings: Vec<Binding>,
    /// Canonical handles whose expressions contain no free variables.
    closed: HashSet<ExprHandle>,
}

impl CanonTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of canonical entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.canon.len()
    }

    /// Returns true if nothing has been canonicalized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canon.is_empty()
    }

    /// Canonicalizes the expression at `root`, returning the canonical
    /// handle and the reuse counters for this call.
    ///
    /// The arena is extended with whatever canonical nodes did not exist
    /// yet; when a rebuilt node is identical to the node already stored at
    /// its source handle, the source handle itself becomes canonical and
    /// nothing is allocated. Interning an already canonical root is a
    /// no-op that reports zero insertions.
    ///
    /// Constants are interned like every other node and deduplicate by
    /// bit pattern.
    pub fn intern(&mut self, arena: &mut ExprArena, root: ExprHandle) -> (ExprHandle, InternStats) {
        let mut stats = InternStats::default();
        let canonical = self.intern_node(arena, root, &mut stats);
        debug_assert!(self.bindings.is_empty(), "scope chain must drain");
        (canonical, stats)
    }

    fn intern_node(
        &mut self,
        arena: &mut ExprArena,
        handle: ExprHandle,
        stats: &mut InternStats,
    ) -> ExprHandle {
        // A handle this table already canonicalized is reused as-is, before
        // any recursion. Its subtree was resolved when it was first seen,
        // so enclosing scopes do not reach into it.
        if let Some(&existing) = self.canon.get(arena.get(handle)) {
            if existing == handle {
                stats.reused += 1;
                return handle;
            }
        }

        match *arena.get(handle) {
            ExprNode::Const(value) => {
                self.canonicalize(arena, handle, ExprNode::Const(value), true, stats)
            }
            ExprNode::Var(name) => match self.resolve(name) {
                // Scope resolution is name bookkeeping, not a table event.
                Some(resolution) => resolution,
                None => self.canonicalize(arena, handle, ExprNode::Var(name), false, stats),
            },
            ExprNode::Add(left, right) => {
                let l = self.intern_node(arena, left, stats);
                let r = self.intern_node(arena, right, stats);
                let closed = self.closed.contains(&l) && self.closed.contains(&r);
                self.canonicalize(arena, handle, ExprNode::Add(l, r), closed, stats)
            }
            ExprNode::Sub(left, right) => {
                let l = self.intern_node(arena, left, stats);
                let r = self.intern_node(arena, right, stats);
                let closed = self.closed.contains(&l) && self.closed.contains(&r);
                self.canonicalize(arena, handle, ExprNode::Sub(l, r), closed, stats)
            }
            ExprNode::Let { name, bound, body } => {
                let bound = self.intern_node(arena, bound, stats);

                // Occurrences of the name substitute the shared bound node
                // only when the bound expression is closed. An open bound
                // would change meaning if the body rebound one of its free
                // variables around a use site, so those stay symbolic.
                let entry = if self.closed.contains(&bound) {
                    Some(bound)
                } else {
                    None
                };

                self.bindings.push((name, entry));
                let body = self.intern_node(arena, body, stats);
                let popped = self.bindings.pop();
                debug_assert_eq!(popped, Some((name, entry)));

                let closed = self.closed.contains(&bound) && self.closed.contains(&body);
                let node = ExprNode::Let { name, bound, body };
                self.canonicalize(arena, handle, node, closed, stats)
            }
        }
    }

    /// Looks a name up in the scope chain, innermost binding first.
    ///
    /// Returns the substitution for the name, if its innermost binding has
    /// one. A shadowing entry without a substitution hides any outer entry,
    /// so the occurrence stays symbolic, exactly as if the name were free.
    fn resolve(&self, name: SymbolId) -> Option<ExprHandle> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound_name, _)| *bound_name == name)
            .and_then(|(_, entry)| *entry)
    }

    /// Runs one node through the structural table.
    fn canonicalize(
        &mut self,
        arena: &mut ExprArena,
        source: ExprHandle,
        candidate: ExprNode,
        closed: bool,
        stats: &mut InternStats,
    ) -> ExprHandle {
        if let Some(&existing) = self.canon.get(&candidate) {
            stats.reused += 1;
            return existing;
        }

        let canonical = if *arena.get(source) == candidate {
            source
        } else {
            arena.push(candidate)
        };
        self.canon.insert(candidate, canonical);
        if closed {
            self.closed.insert(canonical);
        }
        stats.inserted += 1;
        canonical
    }
}
