//! # consus-eval
//!
//! Evaluation of arena expressions against a variable environment.
//!
//! Two entry points with identical semantics:
//! - [`evaluate`] walks the expression as a tree, visiting every node it
//!   reaches and charging one step per visit.
//! - [`evaluate_shared`] memoizes results per handle, so a node reached
//!   through many edges of a hash-consed DAG is computed once. The step
//!   count then measures distinct computations, which is the work actually
//!   saved by sharing.
//!
//! Step counts are returned alongside the value; there is no process-wide
//! counter and evaluation has no hidden state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use consus_core::{ExprArena, ExprHandle, ExprNode, SymbolId};
use thiserror::Error;

#[cfg(test)]
mod proptests;

/// The caller-facing variable environment, keyed by name.
///
/// Evaluation never mutates it: a `let` extends the scope for its body
/// only, through an internal overlay, so sibling evaluations against the
/// same environment are unaffected.
pub type Env = std::collections::HashMap<String, f64>;

/// Errors produced by evaluation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
    /// A variable had no binding in the `let` scope or the environment.
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),
}

/// The result of one evaluation call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    /// The numeric value of the expression.
    pub value: f64,
    /// Nodes visited ([`evaluate`]) or distinct computations performed
    /// ([`evaluate_shared`]).
    pub steps: u64,
}

/// Sentinel for "no overlay frame was read": such a result does not depend
/// on any enclosing `let` and is safe to reuse wherever its node appears.
const NO_FRAME: usize = usize::MAX;

/// Evaluates the expression at `root` as a tree.
///
/// Every node visit charges one step, every variant included; variables
/// resolve innermost `let` first, then `env`.
///
/// # Errors
///
/// Returns [`EvalError::UnboundVariable`] if a variable is bound neither
/// by an enclosing `let` nor by `env`.
///
/// # Panics
///
/// Panics if `root` was not issued by `arena`.
pub fn evaluate(arena: &ExprArena, root: ExprHandle, env: &Env) -> Result<Evaluation, EvalError> {
    let mut frames = Vec::new();
    let mut steps = 0;
    let value = eval_node(arena, root, env, &mut frames, &mut steps)?;
    debug_assert!(frames.is_empty(), "scope overlay must drain");
    Ok(Evaluation { value, steps })
}

/// Evaluates the expression at `root`, reusing results across shared
/// nodes.
///
/// Produces the same value as [`evaluate`]; only the accounting differs.
/// A node's result is cached under its handle the first time it is
/// computed and reused for free afterwards, so on a canonicalized DAG the
/// step count equals the number of distinct computations. Variable
/// lookups are scope-dependent and are never cached; likewise, a result
/// that read a `let` binding introduced outside the node itself is not
/// cached, which keeps hand-shared graphs that reuse one subtree under
/// different bindings correct. On a plain tree, where no handle repeats,
/// this behaves exactly like [`evaluate`].
///
/// # Errors
///
/// Returns [`EvalError::UnboundVariable`] if a variable is bound neither
/// by an enclosing `let` nor by `env`.
///
/// # Panics
///
/// Panics if `root` was not issued by `arena`.
pub fn evaluate_shared(
    arena: &ExprArena,
    root: ExprHandle,
    env: &Env,
) -> Result<Evaluation, EvalError> {
    let mut frames = Vec::new();
    let mut cache = hashbrown::HashMap::new();
    let mut steps = 0;
    let (value, _) = eval_shared_node(arena, root, env, &mut frames, &mut cache, &mut steps)?;
    debug_assert!(frames.is_empty(), "scope overlay must drain");
    Ok(Evaluation { value, steps })
}

/// Resolves a variable, innermost `let` frame first, then the environment.
///
/// Also reports which overlay frame supplied the value, if any; the shared
/// evaluator uses that to decide what is safe to cache.
fn lookup(
    arena: &ExprArena,
    env: &Env,
    frames: &[(SymbolId, f64)],
    name: SymbolId,
) -> Result<(f64, Option<usize>), EvalError> {
    if let Some(position) = frames.iter().rposition(|(n, _)| *n == name) {
        return Ok((frames[position].1, Some(position)));
    }
    let text = arena.symbol_name(name).unwrap_or_default();
    match env.get(text) {
        Some(&value) => Ok((value, None)),
        None => Err(EvalError::UnboundVariable(text.to_string())),
    }
}

fn eval_node(
    arena: &ExprArena,
    handle: ExprHandle,
    env: &Env,
    frames: &mut Vec<(SymbolId, f64)>,
    steps: &mut u64,
) -> Result<f64, EvalError> {
    *steps += 1;
    match *arena.get(handle) {
        ExprNode::Const(value) => Ok(value),
        ExprNode::Var(name) => lookup(arena, env, frames, name).map(|(value, _)| value),
        ExprNode::Add(l, r) => {
            Ok(eval_node(arena, l, env, frames, steps)? + eval_node(arena, r, env, frames, steps)?)
        }
        ExprNode::Sub(l, r) => {
            Ok(eval_node(arena, l, env, frames, steps)? - eval_node(arena, r, env, frames, steps)?)
        }
        ExprNode::Let { name, bound, body } => {
            let value = eval_node(arena, bound, env, frames, steps)?;
            frames.push((name, value));
            let result = eval_node(arena, body, env, frames, steps);
            frames.pop();
            result
        }
    }
}

/// Returns the value together with the outermost overlay frame index the
/// computation read, or [`NO_FRAME`] if it read none.
fn eval_shared_node(
    arena: &ExprArena,
    handle: ExprHandle,
    env: &Env,
    frames: &mut Vec<(SymbolId, f64)>,
    cache: &mut hashbrown::HashMap<ExprHandle, f64>,
    steps: &mut u64,
) -> Result<(f64, usize), EvalError> {
    if let Some(&value) = cache.get(&handle) {
        return Ok((value, NO_FRAME));
    }

    *steps += 1;
    match *arena.get(handle) {
        ExprNode::Const(value) => {
            cache.insert(handle, value);
            Ok((value, NO_FRAME))
        }
        ExprNode::Var(name) => {
            let (value, frame) = lookup(arena, env, frames, name)?;
            Ok((value, frame.unwrap_or(NO_FRAME)))
        }
        ExprNode::Add(l, r) => {
            let (lv, lf) = eval_shared_node(arena, l, env, frames, cache, steps)?;
            let (rv, rf) = eval_shared_node(arena, r, env, frames, cache, steps)?;
            let value = lv + rv;
            let outermost = lf.min(rf);
            if outermost == NO_FRAME {
                cache.insert(handle, value);
            }
            Ok((value, outermost))
        }
        ExprNode::Sub(l, r) => {
            let (lv, lf) = eval_shared_node(arena, l, env, frames, cache, steps)?;
            let (rv, rf) = eval_shared_node(arena, r, env, frames, cache, steps)?;
            let value = lv - rv;
            let outermost = lf.min(rf);
            if outermost == NO_FRAME {
                cache.insert(handle, value);
            }
            Ok((value, outermost))
        }
        ExprNode::Let { name, bound, body } => {
            let depth = frames.len();
            let (bound_value, bound_frame) =
                eval_shared_node(arena, bound, env, frames, cache, steps)?;
            frames.push((name, bound_value));
            let result = eval_shared_node(arena, body, env, frames, cache, steps);
            frames.pop();
            let (value, body_frame) = result?;

            // Reads of this Let's own frame are internal; only reads of an
            // enclosing frame make the result context-dependent.
            let body_frame = if body_frame >= depth { NO_FRAME } else { body_frame };
            let outermost = bound_frame.min(body_frame);
            if outermost == NO_FRAME {
                cache.insert(handle, value);
            }
            Ok((value, outermost))
        }
    }
}
