//! # Consus
//!
//! A workbench for hash-consing: representing expression trees so that
//! structurally identical subtrees are physically shared, turning the tree
//! into a DAG with maximal sharing.
//!
//! ## Quick Start
//!
//! ```rust
//! use consus::prelude::*;
//!
//! let mut arena = ExprArena::new();
//! let seven = arena.number(7.0);
//! let two = arena.number(2.0);
//! let first = arena.add(seven, two);
//! let seven = arena.number(7.0);
//! let two = arena.number(2.0);
//! let second = arena.add(seven, two);
//! let root = arena.sub(first, second);
//!
//! let mut table = CanonTable::new();
//! let (canonical, stats) = table.intern(&mut arena, root);
//!
//! assert_eq!(stats.reused, 3);
//! assert_eq!(arena.reachable_size(canonical), 4);
//! assert_eq!(evaluate(&arena, canonical, &Env::new()).unwrap().value, 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use consus_core as core;
pub use consus_eval as eval;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use consus_core::{CanonTable, ExprArena, ExprHandle, ExprNode, InternStats, SymbolId};
    pub use consus_eval::{evaluate, evaluate_shared, Env, EvalError, Evaluation};
}
