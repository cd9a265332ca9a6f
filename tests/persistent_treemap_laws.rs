//! Property-based tests for PersistentTreeMap.
//!
//! These tests verify that PersistentTreeMap satisfies the expected laws
//! and red-black invariants using proptest.

use ordtree::persistent::{Direction, PersistentTreeMap};
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating a PersistentTreeMap from a vector of key-value pairs.
fn arbitrary_treemap(max_size: usize) -> impl Strategy<Value = PersistentTreeMap<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<PersistentTreeMap<i32, i32>>())
}

/// Strategy for generating a map from strictly ascending keys, which takes
/// the linear bulk build instead of repeated insertion.
fn bulk_built_treemap(max_size: usize) -> impl Strategy<Value = PersistentTreeMap<i32, i32>> {
    prop::collection::btree_map(any::<i32>(), any::<i32>(), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<PersistentTreeMap<i32, i32>>())
}

/// Either construction path, so algebra laws see both tree shapes.
fn any_built_treemap(max_size: usize) -> impl Strategy<Value = PersistentTreeMap<i32, i32>> {
    prop_oneof![arbitrary_treemap(max_size), bulk_built_treemap(max_size)]
}

#[derive(Clone, Debug)]
enum Operation {
    Insert(i16, i32),
    Delete(i16),
}

fn arbitrary_operations() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(
        prop_oneof![
            (any::<i16>(), any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
            any::<i16>().prop_map(Operation::Delete),
        ],
        0..200,
    )
}

/// Routes library events to the test harness output once per process.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// =============================================================================
// Invariant Laws
// =============================================================================

proptest! {
    /// Law: any sequence of inserts and deletes from an empty map keeps the
    /// red-black invariants and agrees with `BTreeMap`.
    #[test]
    fn prop_operation_sequences_keep_invariants(operations in arbitrary_operations()) {
        init_tracing();
        let mut map = PersistentTreeMap::new();
        let mut model = BTreeMap::new();
        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    map = map.insert(key, value);
                    model.insert(key, value);
                }
                Operation::Delete(key) => {
                    map = map.delete(&key);
                    model.remove(&key);
                }
            }
            prop_assert_eq!(map.check_invariants(), Ok(()));
        }
        let entries: Vec<(i16, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i16, i32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// Law: len equals the number of entries a full traversal yields.
    #[test]
    fn prop_len_matches_traversal(map in arbitrary_treemap(100)) {
        prop_assert_eq!(map.len(), map.iter().count());
        prop_assert_eq!(map.len(), map.entries(Direction::Backward).count());
    }
}

// =============================================================================
// Get-Insert Laws
// =============================================================================

proptest! {
    /// Law: get after insert returns the inserted value.
    /// map.insert(key, value).get(&key) == Some(&value)
    #[test]
    fn prop_get_insert_law(map in arbitrary_treemap(50), key: i32, value: i32) {
        let updated = map.insert(key, value);
        prop_assert_eq!(updated.get(&key), Some(&value));
    }

    /// Law: insert does not affect other keys.
    /// key1 != key2 => map.insert(key1, value).get(&key2) == map.get(&key2)
    #[test]
    fn prop_get_insert_other_law(
        map in arbitrary_treemap(50),
        key1: i32,
        key2: i32,
        value: i32
    ) {
        prop_assume!(key1 != key2);
        let updated = map.insert(key1, value);
        prop_assert_eq!(updated.get(&key2), map.get(&key2));
    }

    /// Law: the original map is unchanged by insert.
    #[test]
    fn prop_insert_persistence(map in arbitrary_treemap(50), key: i32, value: i32) {
        let before: Vec<(i32, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        let _updated = map.insert(key, value);
        let after: Vec<(i32, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(before, after);
    }
}

// =============================================================================
// Delete Laws
// =============================================================================

proptest! {
    /// Law: deleting twice is the same as deleting once.
    /// map.delete(&key).delete(&key) == map.delete(&key)
    #[test]
    fn prop_delete_idempotent(map in arbitrary_treemap(50), key: i32) {
        let once = map.delete(&key);
        let twice = once.delete(&key);
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(once.get(&key), None);
    }

    /// Law: removing an inserted key restores the original entries.
    #[test]
    fn prop_insert_remove_roundtrip(map in arbitrary_treemap(50), key: i32, value: i32) {
        prop_assume!(!map.contains_key(&key));
        let (restored, removed) = map.insert(key, value).remove(&key);
        prop_assert_eq!(removed, Some(value));
        prop_assert_eq!(restored, map);
    }
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: forward keys are strictly increasing and backward keys are their
    /// exact reverse.
    #[test]
    fn prop_keys_forward_backward(map in arbitrary_treemap(100)) {
        let forward: Vec<i32> = map.keys(Direction::Forward).copied().collect();
        let mut backward: Vec<i32> = map.keys(Direction::Backward).copied().collect();
        prop_assert!(forward.windows(2).all(|pair| pair[0] < pair[1]));
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    /// Law: range yields exactly the entries between its bounds.
    #[test]
    fn prop_range_matches_filter(map in arbitrary_treemap(100), low: i32, high: i32) {
        let from_range: Vec<i32> = map.range(low..high).map(|(key, _)| *key).collect();
        let from_filter: Vec<i32> = map
            .keys(Direction::Forward)
            .copied()
            .filter(|key| (low..high).contains(key))
            .collect();
        prop_assert_eq!(from_range, from_filter);
    }
}

// =============================================================================
// Algebra Laws
// =============================================================================

proptest! {
    /// Law: union membership is OR and the right operand wins on conflicts.
    #[test]
    fn prop_union_law(left in arbitrary_treemap(60), right in arbitrary_treemap(60)) {
        init_tracing();
        let union = left.union(&right);
        prop_assert_eq!(union.check_invariants(), Ok(()));
        for (key, value) in &union {
            let expected = right.get(key).or_else(|| left.get(key));
            prop_assert_eq!(Some(value), expected);
        }
        for (key, _) in left.iter().chain(right.iter()) {
            prop_assert!(union.contains_key(key));
        }
    }

    /// Law: |A ∪ B| + |A ∩ B| == |A| + |B|
    #[test]
    fn prop_union_intersection_sizes(left in arbitrary_treemap(60), right in arbitrary_treemap(60)) {
        let union = left.union(&right);
        let intersection = left.intersection(&right);
        prop_assert_eq!(union.len() + intersection.len(), left.len() + right.len());
        prop_assert_eq!(intersection.check_invariants(), Ok(()));
    }

    /// Law: difference keeps exactly the keys of the left operand that are
    /// absent from the right one.
    #[test]
    fn prop_difference_law(left in arbitrary_treemap(60), right in arbitrary_treemap(60)) {
        let difference = left.difference(&right);
        prop_assert_eq!(difference.check_invariants(), Ok(()));
        let expected: Vec<i32> = left
            .keys(Direction::Forward)
            .copied()
            .filter(|key| !right.contains_key(key))
            .collect();
        let actual: Vec<i32> = difference.keys(Direction::Forward).copied().collect();
        prop_assert_eq!(actual, expected);
    }

    /// Law: split partitions the map around the key.
    #[test]
    fn prop_split_partitions(map in arbitrary_treemap(100), key: i32) {
        let (less, found, greater) = map.split(&key);
        prop_assert_eq!(found.as_ref(), map.get(&key));
        prop_assert!(less.keys(Direction::Forward).all(|other| *other < key));
        prop_assert!(greater.keys(Direction::Forward).all(|other| *other > key));
        prop_assert_eq!(less.len() + greater.len() + usize::from(found.is_some()), map.len());
        prop_assert_eq!(less.check_invariants(), Ok(()));
        prop_assert_eq!(greater.check_invariants(), Ok(()));
    }
}

// =============================================================================
// Fold Laws
// =============================================================================

proptest! {
    /// Law: fold_left visits entries in the same order as iteration.
    #[test]
    fn prop_fold_left_matches_iter(map in arbitrary_treemap(50)) {
        let folded = map.fold_left(Vec::new(), |mut keys, key, _| {
            keys.push(*key);
            keys
        });
        let iterated: Vec<i32> = map.keys(Direction::Forward).copied().collect();
        prop_assert_eq!(folded, iterated);
    }

    /// Law: map_values keeps keys and length.
    #[test]
    fn prop_map_values_preserves_keys(map in arbitrary_treemap(50)) {
        let mapped = map.map_values(|value| i64::from(*value) * 2);
        prop_assert_eq!(mapped.len(), map.len());
        prop_assert_eq!(mapped.check_invariants(), Ok(()));
        let keys: Vec<&i32> = mapped.keys(Direction::Forward).collect();
        let original: Vec<&i32> = map.keys(Direction::Forward).collect();
        prop_assert_eq!(keys, original);
    }
}

// =============================================================================
// Bulk-Built Operand Laws
// =============================================================================

proptest! {
    /// Law: a bulk-built map satisfies the invariants and matches its input.
    #[test]
    fn prop_bulk_build_valid(entries in prop::collection::btree_map(any::<i32>(), any::<i32>(), 0..300)) {
        let map: PersistentTreeMap<i32, i32> = entries.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(map.check_invariants(), Ok(()));
        let collected: Vec<(i32, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i32, i32)> = entries.into_iter().collect();
        prop_assert_eq!(collected, expected);
    }

    /// Law: algebra over any mix of bulk-built and inserted operands agrees
    /// with `BTreeMap` and keeps the invariants.
    #[test]
    fn prop_algebra_on_bulk_built_operands(
        left in any_built_treemap(120),
        right in any_built_treemap(120)
    ) {
        let left_model: BTreeMap<i32, i32> = left.iter().map(|(key, value)| (*key, *value)).collect();
        let right_model: BTreeMap<i32, i32> = right.iter().map(|(key, value)| (*key, *value)).collect();

        let union = left.union(&right);
        let mut union_model = left_model.clone();
        union_model.extend(right_model.iter().map(|(key, value)| (*key, *value)));
        prop_assert_eq!(union.check_invariants(), Ok(()));
        prop_assert_eq!(union.iter().map(|(key, value)| (*key, *value)).collect::<Vec<_>>(),
            union_model.into_iter().collect::<Vec<_>>());

        let intersection = left.intersection(&right);
        prop_assert_eq!(intersection.check_invariants(), Ok(()));
        let intersection_keys: Vec<i32> = intersection.keys(Direction::Forward).copied().collect();
        let expected_keys: Vec<i32> = left_model.keys().copied().filter(|key| right_model.contains_key(key)).collect();
        prop_assert_eq!(intersection_keys, expected_keys);

        let difference = left.difference(&right);
        prop_assert_eq!(difference.check_invariants(), Ok(()));
        let difference_keys: Vec<i32> = difference.keys(Direction::Forward).copied().collect();
        let expected_keys: Vec<i32> = left_model.keys().copied().filter(|key| !right_model.contains_key(key)).collect();
        prop_assert_eq!(difference_keys, expected_keys);
    }

    /// Law: split of a bulk-built map partitions it into valid trees.
    #[test]
    fn prop_split_bulk_built(map in bulk_built_treemap(200), key: i32) {
        let (less, found, greater) = map.split(&key);
        prop_assert_eq!(found.as_ref(), map.get(&key));
        prop_assert_eq!(less.check_invariants(), Ok(()));
        prop_assert_eq!(greater.check_invariants(), Ok(()));
        prop_assert_eq!(less.len() + greater.len() + usize::from(found.is_some()), map.len());
    }

    /// Law: removing every key of a bulk-built map, in any order, keeps the
    /// invariants at each step and ends empty.
    #[test]
    fn prop_remove_all_from_bulk_built(
        keys in prop::collection::btree_set(any::<i16>(), 0..150).prop_map(|keys| keys.into_iter().collect::<Vec<_>>()).prop_shuffle()
    ) {
        let mut map: PersistentTreeMap<i16, i16> = {
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            sorted.into_iter().map(|key| (key, key)).collect()
        };
        for key in &keys {
            let (shrunk, removed) = map.remove(key);
            prop_assert_eq!(removed, Some(*key));
            prop_assert_eq!(shrunk.check_invariants(), Ok(()));
            map = shrunk;
        }
        prop_assert!(map.is_empty());
    }
}
