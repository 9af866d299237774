//! Property-based tests for the hash-consing pass.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use crate::{CanonTable, ExprArena, ExprHandle};

    const NAMES: [&str; 3] = ["a", "b", "c"];

    /// An arena-independent description of an expression tree.
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

    proptest! {
        // Structural equality across object identities: two independently
        // built copies of a shape canonicalize to the same handle, and the
        // second pass finds everything already present.
        #[test]
        fn same_shape_interns_to_same_handle(shape in shape()) {
            let mut arena = ExprArena::new();
            let first = materialize(&mut arena, &shape);
            let second = materialize(&mut arena, &shape);

            let mut table = CanonTable::new();
            let (a, _) = table.intern(&mut arena, first);
            let (b, stats) = table.intern(&mut arena, second);

            prop_assert_eq!(a, b);
            prop_assert_eq!(stats.inserted, 0);
        }

        #[test]
        fn interning_is_idempotent(shape in shape()) {
            let mut arena = ExprArena::new();
            let root = materialize(&mut arena, &shape);

            let mut table = CanonTable::new();
            let (first, _) = table.intern(&mut arena, root);
            let nodes_before = arena.len();
            let (second, stats) = table.intern(&mut arena, first);

            prop_assert_eq!(first, second);
            prop_assert_eq!(stats.inserted, 0);
            prop_assert_eq!(arena.len(), nodes_before);
        }

        // The defining invariant: among nodes reachable from a canonical
        // root, structural equality and handle equality coincide.
        #[test]
        fn canonical_nodes_are_unique_per_structure(shape in shape()) {
            let mut arena = ExprArena::new();
            let root = materialize(&mut arena, &shape);

            let mut table = CanonTable::new();
            let (canonical, _) = table.intern(&mut arena, root);

            let mut by_content = HashMap::new();
            let mut stack = vec![canonical];
            let mut seen = Vec::new();
            while let Some(handle) = stack.pop() {
                if seen.contains(&handle) {
                    continue;
                }
                seen.push(handle);
                let node = *arena.get(handle);
                if let Some(&other) = by_content.get(&node) {
                    prop_assert_eq!(other, handle);
                } else {
                    by_content.insert(node, handle);
                }
                stack.extend(node.children());
            }
        }

        #[test]
        fn sharing_never_grows_the_expression(shape in shape()) {
            let mut arena = ExprArena::new();
            let root = materialize(&mut arena, &shape);
            let tree_size = arena.reachable_size(root);

            let mut table = CanonTable::new();
            let (canonical, _) = table.intern(&mut arena, root);

            prop_assert!(arena.reachable_size(canonical) <= tree_size);
        }
    }
}
