//! Persistent red-black tree engine shared by the ordered map and set.
//!
//! Everything in this module is a pure function from immutable trees to new
//! immutable trees. A rebuilt tree allocates only the nodes on the path it
//! changed; every other subtree is shared through [`ReferenceCounter`] with
//! the tree it was derived from.
//!
//! # Invariants
//!
//! Every tree handed back to a facade satisfies:
//!
//! 1. keys are in strictly ascending order under the comparator
//! 2. no red node has a red child
//! 3. every path from a node down to a leaf crosses the same number of
//!    black nodes
//! 4. the root is black
//!
//! Helpers in this module and its children may transiently return a red
//! root; the public entry points ([`insert`], [`remove`], [`join::join`])
//! blacken it before returning.
//!
//! # Submodules
//!
//! - [`balance`]: local rotations and recolorings
//! - [`join`]: height-aware join and split of whole subtrees
//! - [`algebra`]: union, intersection and difference over join/split
//! - [`build`]: linear-time construction from ascending input
//! - [`validate`]: invariant checker used by tests and `check_invariants`

pub(crate) mod algebra;
pub(crate) mod balance;
pub(crate) mod build;
pub(crate) mod join;
pub(crate) mod validate;

use super::ReferenceCounter;
use super::comparator::Comparator;
use std::cmp::Ordering;

use balance::{append, bal_left, bal_right, blacken, lbalance, rbalance};

// =============================================================================
// Color and Node Definition
// =============================================================================

/// The color of a red-black tree node. Leaves are implicitly black.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

/// An interior node. Never mutated once it is reachable from a tree.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) color: Color,
    pub(crate) left: Tree<K, V>,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) right: Tree<K, V>,
}

/// A node taken apart: `(color, left, key, value, right)`.
pub(crate) type Parts<K, V> = (Color, Tree<K, V>, K, V, Tree<K, V>);

impl<K: Clone, V: Clone> Node<K, V> {
    /// Takes ownership of the node's fields.
    ///
    /// A uniquely owned node is moved out of its allocation; a shared one is
    /// left intact for its other owners and its key and value are cloned.
    /// Children are always reference-counted handles, so they stay shared.
    pub(crate) fn into_parts(node: ReferenceCounter<Self>) -> Parts<K, V> {
        let node = ReferenceCounter::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone());
        (node.color, node.left, node.key, node.value, node.right)
    }
}

// =============================================================================
// Tree Definition
// =============================================================================

/// A red-black tree: either an empty leaf or a shared interior node.
pub(crate) enum Tree<K, V> {
    Leaf,
    Node(ReferenceCounter<Node<K, V>>),
}

impl<K, V> Clone for Tree<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Leaf => Self::Leaf,
            Self::Node(node) => Self::Node(ReferenceCounter::clone(node)),
        }
    }
}

impl<K, V> Default for Tree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::Leaf
    }
}

impl<K, V> Tree<K, V> {
    #[inline]
    pub(crate) fn new(color: Color, left: Self, key: K, value: V, right: Self) -> Self {
        Self::Node(ReferenceCounter::new(Node {
            color,
            left,
            key,
            value,
            right,
        }))
    }

    #[inline]
    pub(crate) fn red(left: Self, key: K, value: V, right: Self) -> Self {
        Self::new(Color::Red, left, key, value, right)
    }

    #[inline]
    pub(crate) fn black(left: Self, key: K, value: V, right: Self) -> Self {
        Self::new(Color::Black, left, key, value, right)
    }

    #[inline]
    pub(crate) const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Returns the interior node, or `None` for a leaf.
    #[inline]
    pub(crate) fn node(&self) -> Option<&Node<K, V>> {
        match self {
            Self::Leaf => None,
            Self::Node(node) => Some(node),
        }
    }

    /// Color of the root node, `None` for a leaf.
    #[inline]
    pub(crate) fn shade(&self) -> Option<Color> {
        self.node().map(|node| node.color)
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.shade() == Some(Color::Red)
    }

    /// `true` for a black interior node. Leaves do not count.
    #[inline]
    pub(crate) fn is_black_node(&self) -> bool {
        self.shade() == Some(Color::Black)
    }

    /// Leftmost entry.
    pub(crate) fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.node()?;
        while let Some(left) = node.left.node() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Rightmost entry.
    pub(crate) fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.node()?;
        while let Some(right) = node.right.node() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Looks up the entry whose key compares equal to `key`.
    pub(crate) fn get<C>(&self, key: &K, comparator: &C) -> Option<(&K, &V)>
    where
        C: Comparator<K> + ?Sized,
    {
        let mut current = self;
        while let Some(node) = current.node() {
            current = match comparator.compare(key, &node.key) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return Some((&node.key, &node.value)),
            };
        }
        None
    }

    /// Number of interior nodes. O(n).
    pub(crate) fn size(&self) -> usize {
        self.node()
            .map_or(0, |node| node.left.size() + 1 + node.right.size())
    }

    /// Rebuilds the tree with transformed values, keeping shape and colors.
    pub(crate) fn map_values<W, F>(&self, transform: &mut F) -> Tree<K, W>
    where
        K: Clone,
        F: FnMut(&K, &V) -> W,
    {
        match self {
            Self::Leaf => Tree::Leaf,
            Self::Node(node) => {
                let left = node.left.map_values(transform);
                let value = transform(&node.key, &node.value);
                let right = node.right.map_values(transform);
                Tree::new(node.color, left, node.key.clone(), value, right)
            }
        }
    }
}

impl<K: Clone, V: Clone> Tree<K, V> {
    /// Takes apart a tree that the caller knows to be an interior node.
    ///
    /// # Panics
    ///
    /// Panics on a leaf. Reaching that means a balancing shape check is wrong.
    pub(crate) fn into_parts(self) -> Parts<K, V> {
        match self {
            Self::Node(node) => Node::into_parts(node),
            Self::Leaf => panic!("red-black tree: expected an interior node, found a leaf"),
        }
    }
}

// =============================================================================
// Insertion
// =============================================================================

/// Inserts `key` with `value`, returning the new tree and the value the key
/// was previously bound to.
///
/// When the key is already present, `resolve(old, new)` decides the value
/// that is stored and the new key replaces the old one.
pub(crate) fn insert<K, V, C, F>(
    tree: Tree<K, V>,
    key: K,
    value: V,
    comparator: &C,
    resolve: F,
) -> (Tree<K, V>, Option<V>)
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
    F: FnOnce(&V, V) -> V,
{
    let (grown, previous) = insert_into(tree, key, value, comparator, resolve);
    (blacken(grown), previous)
}

fn insert_into<K, V, C, F>(
    tree: Tree<K, V>,
    key: K,
    value: V,
    comparator: &C,
    resolve: F,
) -> (Tree<K, V>, Option<V>)
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
    F: FnOnce(&V, V) -> V,
{
    let Tree::Node(node) = tree else {
        return (Tree::red(Tree::Leaf, key, value, Tree::Leaf), None);
    };
    let (color, left, node_key, node_value, right) = Node::into_parts(node);

    match comparator.compare(&key, &node_key) {
        Ordering::Less => {
            let (left, previous) = insert_into(left, key, value, comparator, resolve);
            let rebuilt = match color {
                Color::Black => lbalance(left, node_key, node_value, right),
                // A red parent is repaired by its black grandparent.
                Color::Red => Tree::red(left, node_key, node_value, right),
            };
            (rebuilt, previous)
        }
        Ordering::Greater => {
            let (right, previous) = insert_into(right, key, value, comparator, resolve);
            let rebuilt = match color {
                Color::Black => rbalance(left, node_key, node_value, right),
                Color::Red => Tree::red(left, node_key, node_value, right),
            };
            (rebuilt, previous)
        }
        Ordering::Equal => {
            let stored = resolve(&node_value, value);
            (
                Tree::new(color, left, key, stored, right),
                Some(node_value),
            )
        }
    }
}

// =============================================================================
// Removal
// =============================================================================

/// Removes `key`, returning the new tree and the removed value.
///
/// Returns `None` when the key is absent; no nodes are rebuilt in that case
/// and the caller keeps its original tree.
pub(crate) fn remove<K, V, C>(tree: &Tree<K, V>, key: &K, comparator: &C) -> Option<(Tree<K, V>, V)>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    let (shrunk, removed) = remove_from(tree, key, comparator)?;
    Some((blacken(shrunk), removed))
}

/// Removing from a black-rooted subtree lowers its black height by one;
/// removing from a red-rooted one keeps it.
fn remove_from<K, V, C>(tree: &Tree<K, V>, key: &K, comparator: &C) -> Option<(Tree<K, V>, V)>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    let node = tree.node()?;

    match comparator.compare(key, &node.key) {
        Ordering::Less => {
            let (left, removed) = remove_from(&node.left, key, comparator)?;
            let rebuilt = if node.left.is_black_node() {
                bal_left(left, node.key.clone(), node.value.clone(), node.right.clone())
            } else {
                Tree::red(left, node.key.clone(), node.value.clone(), node.right.clone())
            };
            Some((rebuilt, removed))
        }
        Ordering::Greater => {
            let (right, removed) = remove_from(&node.right, key, comparator)?;
            let rebuilt = if node.right.is_black_node() {
                bal_right(node.left.clone(), node.key.clone(), node.value.clone(), right)
            } else {
                Tree::red(node.left.clone(), node.key.clone(), node.value.clone(), right)
            };
            Some((rebuilt, removed))
        }
        Ordering::Equal => Some((
            append(node.left.clone(), node.right.clone()),
            node.value.clone(),
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
