//! Local rebalancing primitives.
//!
//! `lbalance`/`rbalance` repair red-red shapes created by growth (insertion
//! and join); `bal_left`/`bal_right` repair a one-level black-height deficit
//! created by shrinking (deletion); `append` merges two key-adjacent trees.

use super::{Color, Tree};

/// Forces a black interior node red.
///
/// # Panics
///
/// Panics on a red node or a leaf.
pub(crate) fn redden<K: Clone, V: Clone>(tree: Tree<K, V>) -> Tree<K, V> {
    assert!(
        tree.is_black_node(),
        "red-black tree: redden expects a black interior node"
    );
    let (_, left, key, value, right) = tree.into_parts();
    Tree::red(left, key, value, right)
}

/// Forces a red root black. Anything else is returned unchanged.
pub(crate) fn blacken<K: Clone, V: Clone>(tree: Tree<K, V>) -> Tree<K, V> {
    if tree.is_red() {
        let (_, left, key, value, right) = tree.into_parts();
        Tree::black(left, key, value, right)
    } else {
        tree
    }
}

fn has_red_left<K, V>(tree: &Tree<K, V>) -> bool {
    tree.node().is_some_and(|node| node.left.is_red())
}

fn has_red_right<K, V>(tree: &Tree<K, V>) -> bool {
    tree.node().is_some_and(|node| node.right.is_red())
}

fn has_black_left<K, V>(tree: &Tree<K, V>) -> bool {
    tree.node().is_some_and(|node| node.left.is_black_node())
}

fn has_black_right<K, V>(tree: &Tree<K, V>) -> bool {
    tree.node().is_some_and(|node| node.right.is_black_node())
}

/// Builds a black node whose left child may be red with a red child.
pub(crate) fn lbalance<K: Clone, V: Clone>(
    left: Tree<K, V>,
    key: K,
    value: V,
    right: Tree<K, V>,
) -> Tree<K, V> {
    if left.is_red() && has_red_left(&left) {
        let (_, left_left, left_key, left_value, left_right) = left.into_parts();
        let (_, a, x, x_value, b) = left_left.into_parts();
        Tree::red(
            Tree::black(a, x, x_value, b),
            left_key,
            left_value,
            Tree::black(left_right, key, value, right),
        )
    } else if left.is_red() && has_red_right(&left) {
        let (_, a, x, x_value, left_right) = left.into_parts();
        let (_, b, y, y_value, c) = left_right.into_parts();
        Tree::red(
            Tree::black(a, x, x_value, b),
            y,
            y_value,
            Tree::black(c, key, value, right),
        )
    } else {
        Tree::black(left, key, value, right)
    }
}

/// Builds a black node whose right child may be red with a red child.
pub(crate) fn rbalance<K: Clone, V: Clone>(
    left: Tree<K, V>,
    key: K,
    value: V,
    right: Tree<K, V>,
) -> Tree<K, V> {
    if right.is_red() && has_red_right(&right) {
        let (_, right_left, right_key, right_value, right_right) = right.into_parts();
        let (_, b, y, y_value, c) = right_right.into_parts();
        Tree::red(
            Tree::black(left, key, value, right_left),
            right_key,
            right_value,
            Tree::black(b, y, y_value, c),
        )
    } else if right.is_red() && has_red_left(&right) {
        let (_, right_left, z, z_value, d) = right.into_parts();
        let (_, b, y, y_value, c) = right_left.into_parts();
        Tree::red(
            Tree::black(left, key, value, b),
            y,
            y_value,
            Tree::black(c, z, z_value, d),
        )
    } else {
        Tree::black(left, key, value, right)
    }
}

/// Rebuilds a node whose left subtree is one black level short.
///
/// # Panics
///
/// Panics when the right subtree cannot lend a black level, which only
/// happens if the tree was already unbalanced.
pub(crate) fn bal_left<K: Clone, V: Clone>(
    left: Tree<K, V>,
    key: K,
    value: V,
    right: Tree<K, V>,
) -> Tree<K, V> {
    if left.is_red() {
        let (_, a, x, x_value, b) = left.into_parts();
        Tree::red(Tree::black(a, x, x_value, b), key, value, right)
    } else if right.is_black_node() {
        let (_, b, y, y_value, c) = right.into_parts();
        rbalance(left, key, value, Tree::red(b, y, y_value, c))
    } else if right.is_red() && has_black_left(&right) {
        let (_, right_left, z, z_value, d) = right.into_parts();
        let (_, b, y, y_value, c) = right_left.into_parts();
        Tree::red(
            Tree::black(left, key, value, b),
            y,
            y_value,
            rbalance(c, z, z_value, redden(d)),
        )
    } else {
        panic!("red-black tree: bal_left reached an unbalanceable shape")
    }
}

/// Rebuilds a node whose right subtree is one black level short.
///
/// # Panics
///
/// Panics when the left subtree cannot lend a black level.
pub(crate) fn bal_right<K: Clone, V: Clone>(
    left: Tree<K, V>,
    key: K,
    value: V,
    right: Tree<K, V>,
) -> Tree<K, V> {
    if right.is_red() {
        let (_, b, y, y_value, c) = right.into_parts();
        Tree::red(left, key, value, Tree::black(b, y, y_value, c))
    } else if left.is_black_node() {
        let (_, a, x, x_value, b) = left.into_parts();
        lbalance(Tree::red(a, x, x_value, b), key, value, right)
    } else if left.is_red() && has_black_right(&left) {
        let (_, a, x, x_value, left_right) = left.into_parts();
        let (_, b, y, y_value, c) = left_right.into_parts();
        Tree::red(
            lbalance(redden(a), x, x_value, b),
            y,
            y_value,
            Tree::black(c, key, value, right),
        )
    } else {
        panic!("red-black tree: bal_right reached an unbalanceable shape")
    }
}

/// Merges two trees whose keys are adjacent (every key of `left` precedes
/// every key of `right`) and whose black heights are equal.
pub(crate) fn append<K: Clone, V: Clone>(left: Tree<K, V>, right: Tree<K, V>) -> Tree<K, V> {
    match (left.shade(), right.shade()) {
        (None, _) => right,
        (_, None) => left,
        (Some(Color::Red), Some(Color::Red)) => {
            let (_, a, x, x_value, b) = left.into_parts();
            let (_, c, y, y_value, d) = right.into_parts();
            let middle = append(b, c);
            if middle.is_red() {
                let (_, b, z, z_value, c) = middle.into_parts();
                Tree::red(
                    Tree::red(a, x, x_value, b),
                    z,
                    z_value,
                    Tree::red(c, y, y_value, d),
                )
            } else {
                Tree::red(a, x, x_value, Tree::red(middle, y, y_value, d))
            }
        }
        (_, Some(Color::Red)) => {
            let (_, c, y, y_value, d) = right.into_parts();
            Tree::red(append(left, c), y, y_value, d)
        }
        (Some(Color::Red), _) => {
            let (_, a, x, x_value, b) = left.into_parts();
            Tree::red(a, x, x_value, append(b, right))
        }
        (Some(Color::Black), Some(Color::Black)) => {
            let (_, a, x, x_value, b) = left.into_parts();
            let (_, c, y, y_value, d) = right.into_parts();
            let middle = append(b, c);
            if middle.is_red() {
                let (_, b, z, z_value, c) = middle.into_parts();
                Tree::red(
                    Tree::black(a, x, x_value, b),
                    z,
                    z_value,
                    Tree::black(c, y, y_value, d),
                )
            } else {
                bal_left(a, x, x_value, Tree::black(middle, y, y_value, d))
            }
        }
    }
}
