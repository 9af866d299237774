//! Property-based tests for evaluation against hash-consing.

#[cfg(test)]
mod tests {
    use consus_core::{CanonTable, ExprArena, ExprHandle};
    use proptest::prelude::*;

    use crate::{evaluate, evaluate_shared, Env};

    const NAMES: [&str; 3] = ["a", "b", "c"];

    /// An arena-independent description of an expression tree.
    ///
    /// Constants are small integers so that every intermediate value is
    /// exactly representable and results can be compared with `==`.
    #[derive(Clone, Debug)]
    enum Shape {
        Const(i16),
        Var(usize),
        Add(Box<Shape>, Box<Shape>),
        Sub(Box<Shape>, Box<Shape>),
        Let(usize, Box<Shape>, Box<Shape>),
    }

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            (-50i16..50).prop_map(Shape::Const),
            (0..NAMES.len()).prop_map(Shape::Var),
        ];
        leaf.prop_recursive(6, 48, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Shape::Add(Box::new(l), Box::new(r))),
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Shape::Sub(Box::new(l), Box::new(r))),
                (0..NAMES.len(), inner.clone(), inner)
                    .prop_map(|(n, b, y)| Shape::Let(n, Box::new(b), Box::new(y))),
            ]
        })
    }

    fn materialize(arena: &mut ExprArena, shape: &Shape) -> ExprHandle {
        match shape {
            Shape::Const(v) => arena.number(f64::from(*v)),
            Shape::Var(i) => arena.variable(NAMES[*i]),
            Shape::Add(l, r) => {
                let l = materialize(arena, l);
                let r = materialize(arena, r);
                arena.add(l, r)
            }
            Shape::Sub(l, r) => {
                let l = materialize(arena, l);
                let r = materialize(arena, r);
                arena.sub(l, r)
            }
            Shape::Let(n, b, y) => {
                let b = materialize(arena, b);
                let y = materialize(arena, y);
                arena.bind(NAMES[*n], b, y)
            }
        }
    }

    /// Every name the generator can produce is bound, so evaluation never
    /// fails and the properties quantify over total environments.
    fn total_env() -> Env {
        [("a", 2.0), ("b", 3.0), ("c", 5.0)]
            .into_iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect()
    }

    proptest! {
        // Canonicalization must not change what an expression means, for
        // either evaluator. Interning reorders no arithmetic, so the
        // values are bitwise equal.
        #[test]
        fn interning_preserves_evaluation(shape in shape()) {
            let mut arena = ExprArena::new();
            let root = materialize(&mut arena, &shape);
            let env = total_env();

            let tree = evaluate(&arena, root, &env).unwrap();

            let mut table = CanonTable::new();
            let (canonical, _) = table.intern(&mut arena, root);

            let plain = evaluate(&arena, canonical, &env).unwrap();
            let shared = evaluate_shared(&arena, canonical, &env).unwrap();

            prop_assert_eq!(tree.value, plain.value);
            prop_assert_eq!(tree.value, shared.value);
        }

        // Sharing can only remove work, never add it.
        #[test]
        fn shared_evaluation_never_does_more_work(shape in shape()) {
            let mut arena = ExprArena::new();
            let root = materialize(&mut arena, &shape);
            let env = total_env();

            let tree = evaluate(&arena, root, &env).unwrap();

            let mut table = CanonTable::new();
            let (canonical, _) = table.intern(&mut arena, root);
            let shared = evaluate_shared(&arena, canonical, &env).unwrap();

            prop_assert!(shared.steps <= tree.steps);
        }

        // On a plain tree no handle repeats, so both evaluators do the
        // same work and report it identically.
        #[test]
        fn shared_evaluation_matches_on_trees(shape in shape()) {
            let mut arena = ExprArena::new();
            let root = materialize(&mut arena, &shape);
            let env = total_env();

            let tree = evaluate(&arena, root, &env).unwrap();
            let shared = evaluate_shared(&arena, root, &env).unwrap();

            prop_assert_eq!(tree.value, shared.value);
            prop_assert_eq!(tree.steps, shared.steps);
        }
    }
}
