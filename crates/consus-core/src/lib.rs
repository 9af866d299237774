//! # consus-core
//!
//! Core expression engine for the Consus hash-consing workbench.
//!
//! This crate provides:
//! - Arena-allocated expression storage with plain (unshared) construction
//! - Type-safe expression handles
//! - A hash-consing pass that rewrites a tree into a maximally shared DAG
//!
//! ## Design Principles
//!
//! - **Trees In, DAGs Out**: clients build ordinary trees in which repeated
//!   structure really is repeated; canonicalization is a separate, explicit
//!   pass so that the cost of both representations can be compared
//! - **Hash-Consing**: every structurally unique expression is represented
//!   by exactly one canonical handle after the pass
//! - **O(1) Structural Equality**: canonical handles compare by identity

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod canon;
pub mod expr;
pub mod handle;

#[cfg(test)]
mod proptests;

pub use arena::ExprArena;
pub use canon::{CanonTable, InternStats};
pub use expr::{ExprNode, SymbolId};
pub use handle::ExprHandle;
