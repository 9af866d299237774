//! Arena storage for expression trees.
//!
//! The arena is append-only and does **not** deduplicate on construction:
//! building the same subtree twice stores it twice. That is deliberate.
//! Clients first build an ordinary tree, then run the canonicalization pass
//! in [`crate::canon`] to obtain the maximally shared form, which lets the
//! two representations be measured against each other.

use std::fmt::Write as _;

use hashbrown::{HashMap, HashSet};

use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;

/// Storage for expression nodes and interned variable names.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    /// All nodes, raw and canonical alike.
    nodes: Vec<ExprNode>,
    /// Maps variable names to their ids.
    symbols: HashMap<String, SymbolId>,
    /// Reverse symbol table for rendering and diagnostics.
    symbol_names: Vec<String>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated node capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            symbols: HashMap::new(),
            symbol_names: Vec::new(),
        }
    }

    /// Appends a node and returns its handle.
    ///
    /// No deduplication happens here; see the module docs.
    pub fn push(&mut self, node: ExprNode) -> ExprHandle {
        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        self.nodes.push(node);
        ExprHandle::new(index as u32)
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Returns the number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Interns a variable name, returning its id.
    ///
    /// Name interning is bookkeeping for `Var` and `Let` nodes; it is
    /// unrelated to the canonicalization table and to the evaluation
    /// environment, which are keyed separately.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }

        let id = self.symbol_names.len() as SymbolId;
        self.symbols.insert(name.to_string(), id);
        self.symbol_names.push(name.to_string());
        id
    }

    /// Gets the name behind a symbol id.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbol_names.get(id as usize).map(String::as_str)
    }

    // === Convenience constructors ===

    /// Creates a literal.
    pub fn number(&mut self, value: f64) -> ExprHandle {
        self.push(ExprNode::Const(value))
    }

    /// Creates a variable reference.
    pub fn variable(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.push(ExprNode::Var(id))
    }

    /// Creates an addition.
    pub fn add(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.push(ExprNode::Add(left, right))
    }

    /// Creates a subtraction.
    pub fn sub(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.push(ExprNode::Sub(left, right))
    }

    /// Creates a `let` binding of `name` to `bound`, scoped to `body`.
    pub fn bind(&mut self, name: &str, bound: ExprHandle, body: ExprHandle) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.push(ExprNode::Let {
            name: id,
            bound,
            body,
        })
    }

    // === Inspection ===

    /// Renders an expression as text.
    ///
    /// Literals print as their numeral, variables as their name, and the
    /// binary cases as `(left + right)` or `(left - right)`. A `Let` prints
    /// as its body alone; the binding itself is not shown.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this arena.
    #[must_use]
    pub fn render(&self, handle: ExprHandle) -> String {
        let mut out = String::new();
        self.render_into(handle, &mut out);
        out
    }

    fn render_into(&self, handle: ExprHandle, out: &mut String) {
        match self.get(handle) {
            ExprNode::Const(v) => {
                let _ = write!(out, "{v}");
            }
            ExprNode::Var(name) => {
                out.push_str(&self.symbol_names[*name as usize]);
            }
            ExprNode::Add(l, r) => {
                out.push('(');
                self.render_into(*l, out);
                out.push_str(" + ");
                self.render_into(*r, out);
                out.push(')');
            }
            ExprNode::Sub(l, r) => {
                out.push('(');
                self.render_into(*l, out);
                out.push_str(" - ");
                self.render_into(*r, out);
                out.push(')');
            }
            ExprNode::Let { body, .. } => self.render_into(*body, out),
        }
    }

    /// Counts the distinct nodes reachable from a handle.
    ///
    /// On a freshly built tree this equals the node count of the tree; on a
    /// canonicalized root it is the size of the shared DAG, which is the
    /// memory-side measure of what hash-consing saved.
    #[must_use]
    pub fn reachable_size(&self, root: ExprHandle) -> usize {
        let mut seen: HashSet<ExprHandle> = HashSet::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            if seen.insert(handle) {
                stack.extend(self.get(handle).children());
            }
        }
        seen.len()
    }
}
