//! Join and split of whole subtrees.
//!
//! `join` combines two trees separated by a pivot entry in time proportional
//! to the difference of their black heights. `split` partitions a tree
//! around a key with O(log n) joins. Together they are the basis of the set
//! algebra in [`super::algebra`].

use super::balance::{blacken, lbalance, rbalance};
use super::{Color, Node, Tree};
use crate::persistent::comparator::Comparator;
use std::cmp::Ordering;

/// Number of black nodes on the leftmost spine.
///
/// Every root-to-leaf path has the same count, so the leftmost one is
/// representative.
pub(crate) fn black_height<K, V>(tree: &Tree<K, V>) -> usize {
    let mut height = 0;
    let mut current = tree;
    while let Some(node) = current.node() {
        if node.color == Color::Black {
            height += 1;
        }
        current = &node.left;
    }
    height
}

/// Joins `left`, the pivot entry and `right` into one balanced tree.
///
/// Precondition: every key of `left` precedes `key`, which precedes every
/// key of `right`. The result root is black.
pub(crate) fn join<K: Clone, V: Clone>(
    left: Tree<K, V>,
    key: K,
    value: V,
    right: Tree<K, V>,
) -> Tree<K, V> {
    let left = blacken(left);
    let right = blacken(right);
    let left_height = black_height(&left);
    let right_height = black_height(&right);

    match left_height.cmp(&right_height) {
        Ordering::Greater => blacken(join_right(left, left_height, key, value, right, right_height)),
        Ordering::Less => blacken(join_left(left, left_height, key, value, right, right_height)),
        Ordering::Equal => Tree::black(left, key, value, right),
    }
}

/// Descends the left spine of the taller `right` until black heights meet.
///
/// `left` must have a black (or leaf) root. The result has the black height
/// of `right` and may be a red node with a red left child; the black parent's
/// `lbalance` or the final `blacken` removes that.
fn join_left<K: Clone, V: Clone>(
    left: Tree<K, V>,
    left_height: usize,
    key: K,
    value: V,
    right: Tree<K, V>,
    right_height: usize,
) -> Tree<K, V> {
    if right_height <= left_height {
        return Tree::red(left, key, value, right);
    }
    let Tree::Node(node) = right else {
        panic!("red-black tree: join_left ran out of nodes above the target height")
    };
    let (color, right_left, right_key, right_value, right_right) = Node::into_parts(node);
    match color {
        Color::Red => Tree::red(
            join_left(left, left_height, key, value, right_left, right_height),
            right_key,
            right_value,
            right_right,
        ),
        Color::Black => lbalance(
            join_left(left, left_height, key, value, right_left, right_height - 1),
            right_key,
            right_value,
            right_right,
        ),
    }
}

/// Mirror of [`join_left`] for a taller `left`.
fn join_right<K: Clone, V: Clone>(
    left: Tree<K, V>,
    left_height: usize,
    key: K,
    value: V,
    right: Tree<K, V>,
    right_height: usize,
) -> Tree<K, V> {
    if left_height <= right_height {
        return Tree::red(left, key, value, right);
    }
    let Tree::Node(node) = left else {
        panic!("red-black tree: join_right ran out of nodes above the target height")
    };
    let (color, left_left, left_key, left_value, left_right) = Node::into_parts(node);
    match color {
        Color::Red => Tree::red(
            left_left,
            left_key,
            left_value,
            join_right(left_right, left_height, key, value, right, right_height),
        ),
        Color::Black => rbalance(
            left_left,
            left_key,
            left_value,
            join_right(left_right, left_height - 1, key, value, right, right_height),
        ),
    }
}

/// Removes the minimum entry, returning it with the remaining tree.
pub(crate) fn split_min<K: Clone, V: Clone>(tree: Tree<K, V>) -> Option<(K, V, Tree<K, V>)> {
    let Tree::Node(node) = tree else {
        return None;
    };
    let (_, left, key, value, right) = Node::into_parts(node);
    if left.is_leaf() {
        return Some((key, value, right));
    }
    let (min_key, min_value, rest) = split_min(left)?;
    Some((min_key, min_value, join(rest, key, value, right)))
}

/// Joins two trees without a pivot, borrowing the minimum of `right`.
pub(crate) fn join2<K: Clone, V: Clone>(left: Tree<K, V>, right: Tree<K, V>) -> Tree<K, V> {
    if left.is_leaf() {
        return right;
    }
    match split_min(right) {
        None => left,
        Some((key, value, rest)) => join(left, key, value, rest),
    }
}

/// Result of [`split`]: keys below the pivot, the pivot's value if present,
/// and keys above the pivot.
pub(crate) type Split<K, V> = (Tree<K, V>, Option<V>, Tree<K, V>);

/// Partitions `tree` around `key`.
pub(crate) fn split<K, V, C>(key: &K, tree: Tree<K, V>, comparator: &C) -> Split<K, V>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    let Tree::Node(node) = tree else {
        return (Tree::Leaf, None, Tree::Leaf);
    };
    let (_, left, node_key, node_value, right) = Node::into_parts(node);

    match comparator.compare(key, &node_key) {
        Ordering::Less => {
            let (less, found, greater) = split(key, left, comparator);
            (less, found, join(greater, node_key, node_value, right))
        }
        Ordering::Greater => {
            let (less, found, greater) = split(key, right, comparator);
            (join(left, node_key, node_value, less), found, greater)
        }
        Ordering::Equal => (left, Some(node_value), right),
    }
}
