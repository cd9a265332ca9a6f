//! Union, intersection and difference by split and join.
//!
//! Each operation takes the root of the first tree as a pivot, splits the
//! second tree on it, recurses on the matching halves and joins the results.
//! For trees of sizes m <= n this costs O(m log(n/m + 1)) rather than the
//! O(m log n) of inserting one tree into the other element by element, and
//! whole subtrees that have no counterpart are reused untouched.
//!
//! Alongside the tree every operation returns the count its caller needs to
//! keep a cached length exact without traversing the result.

use super::join::{join, join2, split};
use super::{Node, Tree};
use crate::persistent::comparator::Comparator;

/// Union of two trees.
///
/// On a shared key, `resolve(key, left_value, right_value)` produces the
/// stored value; the key from `left` is kept. The resolver runs in ascending
/// key order.
///
/// Returns the tree and the number of shared keys.
pub(crate) fn union<K, V, C, F>(
    left: Tree<K, V>,
    right: Tree<K, V>,
    comparator: &C,
    resolve: &mut F,
) -> (Tree<K, V>, usize)
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
    F: FnMut(&K, V, V) -> V,
{
    if right.is_leaf() {
        return (left, 0);
    }
    let Tree::Node(node) = left else {
        return (right, 0);
    };
    let (_, left_less, key, value, left_greater) = Node::into_parts(node);
    let (right_less, found, right_greater) = split(&key, right, comparator);

    let (less, less_shared) = union(left_less, right_less, comparator, resolve);
    let (value, shared) = match found {
        Some(other) => (resolve(&key, value, other), 1),
        None => (value, 0),
    };
    let (greater, greater_shared) = union(left_greater, right_greater, comparator, resolve);

    (
        join(less, key, value, greater),
        less_shared + shared + greater_shared,
    )
}

/// Intersection of two trees.
///
/// For every shared key `resolve(key, left_value, right_value)` produces the
/// stored value. Returns the tree and its size.
pub(crate) fn intersect<K, V, C, F>(
    left: Tree<K, V>,
    right: Tree<K, V>,
    comparator: &C,
    resolve: &mut F,
) -> (Tree<K, V>, usize)
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
    F: FnMut(&K, V, V) -> V,
{
    if right.is_leaf() {
        return (Tree::Leaf, 0);
    }
    let Tree::Node(node) = left else {
        return (Tree::Leaf, 0);
    };
    let (_, left_less, key, value, left_greater) = Node::into_parts(node);
    let (right_less, found, right_greater) = split(&key, right, comparator);

    let (less, less_size) = intersect(left_less, right_less, comparator, resolve);
    let kept = found.map(|other| resolve(&key, value, other));
    let (greater, greater_size) = intersect(left_greater, right_greater, comparator, resolve);

    match kept {
        Some(value) => (join(less, key, value, greater), less_size + 1 + greater_size),
        None => (join2(less, greater), less_size + greater_size),
    }
}

/// Entries of `left` whose keys are absent from `right`.
///
/// Returns the tree and the number of entries removed from `left`.
pub(crate) fn difference<K, V, C>(
    left: Tree<K, V>,
    right: Tree<K, V>,
    comparator: &C,
) -> (Tree<K, V>, usize)
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    if right.is_leaf() {
        return (left, 0);
    }
    let Tree::Node(node) = left else {
        return (Tree::Leaf, 0);
    };
    let (_, left_less, key, value, left_greater) = Node::into_parts(node);
    let (right_less, found, right_greater) = split(&key, right, comparator);

    let (less, less_removed) = difference(left_less, right_less, comparator);
    let (greater, greater_removed) = difference(left_greater, right_greater, comparator);

    if found.is_some() {
        (join2(less, greater), less_removed + 1 + greater_removed)
    } else {
        (join(less, key, value, greater), less_removed + greater_removed)
    }
}

#[cfg(test)]
mod tests {
    use super::super::balance::blacken;
    use super::super::tests::{keys_of, tree_of};
    use super::super::validate::check_tree;
    use super::*;
    use crate::persistent::comparator::OrdComparator;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn keep_left(_: &i32, left: i32, _: i32) -> i32 {
        left
    }

    fn sets(left: &[i32], right: &[i32]) -> (BTreeSet<i32>, BTreeSet<i32>) {
        (
            left.iter().copied().collect(),
            right.iter().copied().collect(),
        )
    }

    #[rstest]
    #[case::overlapping(vec![0, 1, 2], vec![1, 2, 3])]
    #[case::disjoint(vec![0, 2, 4], vec![1, 3, 5])]
    #[case::left_empty(vec![], vec![1, 2])]
    #[case::right_empty(vec![1, 2], vec![])]
    #[case::skewed((0..300).collect(), vec![-5, 17, 150, 299, 1000])]
    #[case::identical((0..64).collect(), (0..64).collect())]
    fn test_union_matches_reference(#[case] left: Vec<i32>, #[case] right: Vec<i32>) {
        let (left_set, right_set) = sets(&left, &right);
        let (tree, shared) = union(
            tree_of(left),
            tree_of(right),
            &OrdComparator,
            &mut keep_left,
        );
        let tree = blacken(tree);
        check_tree(&tree, &OrdComparator).expect("valid union");
        let expected: Vec<i32> = left_set.union(&right_set).copied().collect();
        assert_eq!(keys_of(&tree), expected);
        assert_eq!(shared, left_set.intersection(&right_set).count());
    }

    #[rstest]
    #[case::overlapping(vec![0, 1, 2], vec![1, 2, 3])]
    #[case::disjoint(vec![0, 2, 4], vec![1, 3, 5])]
    #[case::skewed((0..300).collect(), vec![-5, 17, 150, 299, 1000])]
    #[case::identical((0..64).collect(), (0..64).collect())]
    fn test_intersect_matches_reference(#[case] left: Vec<i32>, #[case] right: Vec<i32>) {
        let (left_set, right_set) = sets(&left, &right);
        let (tree, size) = intersect(
            tree_of(left),
            tree_of(right),
            &OrdComparator,
            &mut keep_left,
        );
        let tree = blacken(tree);
        check_tree(&tree, &OrdComparator).expect("valid intersection");
        let expected: Vec<i32> = left_set.intersection(&right_set).copied().collect();
        assert_eq!(size, expected.len());
        assert_eq!(keys_of(&tree), expected);
    }

    #[rstest]
    #[case::overlapping(vec![0, 1, 2], vec![1, 2, 3])]
    #[case::disjoint(vec![0, 2, 4], vec![1, 3, 5])]
    #[case::skewed((0..300).collect(), vec![-5, 17, 150, 299, 1000])]
    #[case::identical((0..64).collect(), (0..64).collect())]
    fn test_difference_matches_reference(#[case] left: Vec<i32>, #[case] right: Vec<i32>) {
        let (left_set, right_set) = sets(&left, &right);
        let (tree, removed) = difference(tree_of(left), tree_of(right), &OrdComparator);
        let tree = blacken(tree);
        check_tree(&tree, &OrdComparator).expect("valid difference");
        let expected: Vec<i32> = left_set.difference(&right_set).copied().collect();
        assert_eq!(removed, left_set.len() - expected.len());
        assert_eq!(keys_of(&tree), expected);
    }

    #[rstest]
    fn test_union_resolver_runs_in_key_order() {
        let mut seen = Vec::new();
        let (tree, _) = union(
            tree_of(0..40),
            tree_of(20..60),
            &OrdComparator,
            &mut |key: &i32, left: i32, right: i32| {
                seen.push(*key);
                left + right
            },
        );
        assert_eq!(seen, (20..40).collect::<Vec<_>>());
        assert_eq!(tree.get(&25, &OrdComparator), Some((&25, &500)));
    }
}
