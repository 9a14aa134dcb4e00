use super::*;

use crate::node::Node;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Walk the whole tree and check the structural invariants: siblings sorted
/// by strictly increasing leading byte, no empty fragment below the root, no
/// dangling single-child branch nodes, and exactly `len` leaf flags.
fn validate_set(set: &RadixSet) {
    let mut stack: Vec<&Node> = vec![&set.root];
    let mut leaf_count = 0usize;

    while let Some(node) = stack.pop() {
        if node.is_leaf {
            leaf_count += 1;
        }

        if !std::ptr::eq(node, &set.root) {
            assert!(!node.fragment.is_empty(), "non-root node with empty fragment");
            assert!(
                node.is_leaf || node.children.len() >= 2,
                "branch node must be a leaf or have at least two children"
            );
        }

        for pair in node.children.windows(2) {
            assert!(
                pair[0].fragment[0] < pair[1].fragment[0],
                "siblings out of order: {:#04x} !< {:#04x}",
                pair[0].fragment[0],
                pair[1].fragment[0]
            );
        }

        for child in &node.children {
            stack.push(child);
        }
    }

    assert_eq!(leaf_count, set.len(), "leaf flags must match len");
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>),
    Contains(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Mostly keys over a tiny alphabet so that shared prefixes, splits and
    // branch-point promotions happen constantly, with a sprinkle of
    // arbitrary bytes to cover the full alphabet.
    prop_oneof![
        4 => prop::collection::vec(b'a'..=b'd', 0..=8),
        1 => prop::collection::vec(any::<u8>(), 0..=24),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        2 => key.clone().prop_map(Op::Insert),
        1 => key.prop_map(Op::Contains),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreeset(ops in ops_strategy()) {
        let mut set = RadixSet::new();
        let mut oracle: BTreeSet<Vec<u8>> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    let added = set.insert(&key);
                    prop_assert_eq!(added, oracle.insert(key));
                }
                Op::Contains(key) => {
                    prop_assert_eq!(set.contains(&key), oracle.contains(&key));
                }
            }

            prop_assert_eq!(set.len(), oracle.len());
        }

        validate_set(&set);
        for key in &oracle {
            prop_assert!(set.contains(key));
        }
    }
}

/// Call `f` with every permutation of `items`, generated by prefix swaps.
fn for_each_permutation<T: Clone>(items: &mut [T], from: usize, f: &mut impl FnMut(&[T])) {
    if from == items.len() {
        f(items);
        return;
    }
    for i in from..items.len() {
        items.swap(from, i);
        for_each_permutation(items, from + 1, f);
        items.swap(from, i);
    }
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<Vec<u8>> = vec![
        b"".to_vec(),
        b"a".to_vec(),
        b"ab".to_vec(),
        b"abc".to_vec(),
        b"ad".to_vec(),
        b"b".to_vec(),
    ];

    let expected = keys.len();
    for_each_permutation(&mut keys.clone(), 0, &mut |perm| {
        let mut set = RadixSet::new();
        for key in perm {
            assert!(set.insert(key), "fresh key rejected: {:?}", key);
        }

        validate_set(&set);
        assert_eq!(set.len(), expected);
        for key in &keys {
            assert!(set.contains(key));
        }
        assert!(!set.contains(b"ac"));
        assert!(!set.contains(b"abcd"));
        assert!(!set.contains(b"ba"));
    });
}

#[test]
fn shuffled_insert_orders_agree_on_membership() {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let keys: Vec<Vec<u8>> = (0..100u32)
        .map(|i| format!("dict/{:x}/{}", i % 16, i).into_bytes())
        .collect();
    let probes: Vec<Vec<u8>> = keys
        .iter()
        .flat_map(|k| {
            let mut shorter = k.clone();
            shorter.pop();
            let mut longer = k.clone();
            longer.push(b'!');
            [k.clone(), shorter, longer]
        })
        .collect();

    let reference: Vec<bool> = {
        let mut set = RadixSet::new();
        for key in &keys {
            assert!(set.insert(key));
        }
        probes.iter().map(|p| set.contains(p)).collect()
    };

    let mut rng = rand::rngs::StdRng::seed_from_u64(0xD1C7);
    let mut order = keys.clone();
    for _ in 0..10 {
        order.shuffle(&mut rng);

        let mut set = RadixSet::new();
        for key in &order {
            assert!(set.insert(key));
        }
        validate_set(&set);

        let answers: Vec<bool> = probes.iter().map(|p| set.contains(p)).collect();
        assert_eq!(answers, reference, "membership depends on insertion order");
    }
}
