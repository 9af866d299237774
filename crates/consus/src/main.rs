//! Interactive demonstration of hash-consing.
//!
//! Prompts for a value of `x`, builds two `let`-bound sample expressions,
//! and reports for each what sharing buys: table activity, distinct node
//! counts, step counts, and wall-clock time over repeated runs.

use std::io::{self, Write as _};
use std::process;
use std::time::{Duration, Instant};

use consus::prelude::*;

const TIMING_ROUNDS: u32 = 10_000;

fn main() {
    let x = read_x();

    let mut arena = ExprArena::new();
    let root = doubled_sum(&mut arena, x);
    run_demo(
        &format!("let x = {x} in ((x + 2) + (x + 2))"),
        &mut arena,
        root,
    );

    let mut arena = ExprArena::new();
    let root = nested_showcase(&mut arena, x);
    run_demo(
        &format!("let x = {x} in a nested tower of repeated sums"),
        &mut arena,
        root,
    );
}

fn read_x() -> f64 {
    print!("Enter the value of x: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() || line.is_empty() {
        eprintln!("no input");
        process::exit(1);
    }
    match line.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("not a number: {}", line.trim());
            process::exit(1);
        }
    }
}

/// `let x = <value> in ((x + 2) + (x + 2))`.
fn doubled_sum(arena: &mut ExprArena, value: f64) -> ExprHandle {
    let bound = arena.number(value);
    let x = arena.variable("x");
    let two = arena.number(2.0);
    let left = arena.add(x, two);
    let x = arena.variable("x");
    let two = arena.number(2.0);
    let right = arena.add(x, two);
    let body = arena.add(left, right);
    arena.bind("x", bound, body)
}

/// A deeper tower in which `(x + 2)`, `(1 + 2)` and their difference all
/// occur repeatedly.
fn nested_showcase(arena: &mut ExprArena, value: f64) -> ExprHandle {
    let x_plus_2 = |arena: &mut ExprArena| {
        let x = arena.variable("x");
        let two = arena.number(2.0);
        arena.add(x, two)
    };
    let small_sum = |arena: &mut ExprArena, n: f64| {
        let n = arena.number(n);
        let two = arena.number(2.0);
        arena.add(n, two)
    };

    let five_two = small_sum(arena, 5.0);
    let three_two = small_sum(arena, 3.0);
    let head = arena.sub(five_two, three_two);

    let xp = x_plus_2(arena);
    let one_two = small_sum(arena, 1.0);
    let first_diff = arena.sub(xp, one_two);

    let upper = arena.add(head, first_diff);
    let one_two = small_sum(arena, 1.0);
    let upper = arena.sub(upper, one_two);

    let xp = x_plus_2(arena);
    let one_two = small_sum(arena, 1.0);
    let second_diff = arena.sub(xp, one_two);

    let body = arena.sub(upper, second_diff);
    let bound = arena.number(value);
    arena.bind("x", bound, body)
}

fn run_demo(title: &str, arena: &mut ExprArena, root: ExprHandle) {
    println!();
    println!("=== {title} ===");

    let env = Env::new();
    let pristine = arena.clone();
    let tree_size = arena.reachable_size(root);

    let tree = match evaluate(arena, root, &env) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("evaluation failed: {err}");
            process::exit(1);
        }
    };
    println!("expression:         {}", arena.render(root));
    println!(
        "tree evaluation:    {} in {} steps over {} nodes",
        tree.value, tree.steps, tree_size
    );

    let mut table = CanonTable::new();
    let (canonical, stats) = table.intern(arena, root);
    println!(
        "hash-consing:       {} reused, {} inserted, {} table entries",
        stats.reused,
        stats.inserted,
        table.len()
    );
    println!("canonical form:     {}", arena.render(canonical));
    println!(
        "distinct nodes:     {} (down from {})",
        arena.reachable_size(canonical),
        tree_size
    );

    let shared = match evaluate_shared(arena, canonical, &env) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("evaluation failed: {err}");
            process::exit(1);
        }
    };
    println!(
        "shared evaluation:  {} in {} steps",
        shared.value, shared.steps
    );

    let tree_time = time_rounds(|| {
        let _ = evaluate(arena, root, &env);
    });
    let intern_time = time_rounds(|| {
        let mut scratch = pristine.clone();
        let mut fresh = CanonTable::new();
        fresh.intern(&mut scratch, root);
    });
    let shared_time = time_rounds(|| {
        let _ = evaluate_shared(arena, canonical, &env);
    });
    println!(
        "time ({TIMING_ROUNDS} rounds):  tree eval {tree_time:?}, intern {intern_time:?}, shared eval {shared_time:?}"
    );
}

fn time_rounds(mut round: impl FnMut()) -> Duration {
    let start = Instant::now();
    for _ in 0..TIMING_ROUNDS {
        round();
    }
    start.elapsed()
}
