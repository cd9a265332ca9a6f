//! Property-based tests for PersistentTreeSet.
//!
//! These tests check the set algebra against boolean membership and against
//! `BTreeSet`.

use ordtree::persistent::{Direction, PersistentTreeSet};
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

fn arbitrary_elements(max_size: usize) -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(any::<i16>(), 0..max_size)
}

fn both(elements: &[i16]) -> (PersistentTreeSet<i16>, BTreeSet<i16>) {
    (
        elements.iter().copied().collect(),
        elements.iter().copied().collect(),
    )
}

fn contents(set: &PersistentTreeSet<i16>) -> Vec<i16> {
    set.iter().copied().collect()
}

// =============================================================================
// Membership Laws
// =============================================================================

proptest! {
    /// Law: x ∈ A ∪ B <=> x ∈ A || x ∈ B
    #[test]
    fn prop_union_membership(
        left in arbitrary_elements(80),
        right in arbitrary_elements(80),
        probe: i16
    ) {
        let (left, _) = both(&left);
        let (right, _) = both(&right);
        let union = left.union(&right);
        prop_assert_eq!(union.contains(&probe), left.contains(&probe) || right.contains(&probe));
    }

    /// Law: x ∈ A ∩ B <=> x ∈ A && x ∈ B
    #[test]
    fn prop_intersection_membership(
        left in arbitrary_elements(80),
        right in arbitrary_elements(80),
        probe: i16
    ) {
        let (left, _) = both(&left);
        let (right, _) = both(&right);
        let intersection = left.intersection(&right);
        prop_assert_eq!(
            intersection.contains(&probe),
            left.contains(&probe) && right.contains(&probe)
        );
    }

    /// Law: x ∈ A \ B <=> x ∈ A && x ∉ B
    #[test]
    fn prop_difference_membership(
        left in arbitrary_elements(80),
        right in arbitrary_elements(80),
        probe: i16
    ) {
        let (left, _) = both(&left);
        let (right, _) = both(&right);
        let difference = left.difference(&right);
        prop_assert_eq!(
            difference.contains(&probe),
            left.contains(&probe) && !right.contains(&probe)
        );
    }
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: every algebra result matches `BTreeSet` and keeps the invariants.
    #[test]
    fn prop_algebra_matches_btreeset(
        left in arbitrary_elements(200),
        right in arbitrary_elements(200)
    ) {
        let (left, left_model) = both(&left);
        let (right, right_model) = both(&right);

        let union = left.union(&right);
        let intersection = left.intersection(&right);
        let difference = left.difference(&right);
        let symmetric = left.symmetric_difference(&right);

        prop_assert_eq!(contents(&union), left_model.union(&right_model).copied().collect::<Vec<_>>());
        prop_assert_eq!(
            contents(&intersection),
            left_model.intersection(&right_model).copied().collect::<Vec<_>>()
        );
        prop_assert_eq!(
            contents(&difference),
            left_model.difference(&right_model).copied().collect::<Vec<_>>()
        );
        prop_assert_eq!(
            contents(&symmetric),
            left_model.symmetric_difference(&right_model).copied().collect::<Vec<_>>()
        );
        for set in [&union, &intersection, &difference, &symmetric] {
            prop_assert_eq!(set.check_invariants(), Ok(()));
        }
    }

    /// Law: |A ∪ B| + |A ∩ B| == |A| + |B|
    #[test]
    fn prop_union_intersection_size(
        left in arbitrary_elements(100),
        right in arbitrary_elements(100)
    ) {
        let (left, _) = both(&left);
        let (right, _) = both(&right);
        prop_assert_eq!(
            left.union(&right).len() + left.intersection(&right).len(),
            left.len() + right.len()
        );
    }

    /// Law: subset, disjointness and equality agree with `BTreeSet`.
    #[test]
    fn prop_relations_match_btreeset(
        left in arbitrary_elements(30),
        right in arbitrary_elements(30)
    ) {
        let (left, left_model) = both(&left);
        let (right, right_model) = both(&right);
        prop_assert_eq!(left.is_subset(&right), left_model.is_subset(&right_model));
        prop_assert_eq!(left.is_disjoint(&right), left_model.is_disjoint(&right_model));
        prop_assert_eq!(left.equals(&right), left_model == right_model);
        prop_assert!(left.intersection(&right).is_subset(&left));
        prop_assert!(left.union(&right).is_superset(&right));
    }

    /// Law: backward traversal is the reverse of forward traversal.
    #[test]
    fn prop_backward_is_reverse(elements in arbitrary_elements(100)) {
        let (set, _) = both(&elements);
        let forward: Vec<i16> = set.values(Direction::Forward).copied().collect();
        let mut backward: Vec<i16> = set.values(Direction::Backward).copied().collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }
}
