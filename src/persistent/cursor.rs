//! Non-recursive in-order traversal of red-black trees.
//!
//! A cursor keeps an explicit work-list of pending tasks, each either
//! "visit this subtree" or "yield this entry". Taking the next entry pops
//! tasks until a yield is reached, expanding each visited subtree in place:
//! forward traversal expands a node to `(left, yield, right)`, backward
//! traversal to `(right, yield, left)`. An empty work-list is the terminal
//! state.
//!
//! The work-list never holds more than two tasks per tree level, so a
//! suspended cursor costs O(log n) space, and a full traversal takes O(n)
//! time. Because nodes are immutable, a cursor is a stable snapshot of the
//! tree it started from; abandoning it needs nothing beyond dropping it.

use super::ReferenceCounter;
use super::comparator::Comparator;
use super::rbtree::{Node, Tree};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::ops::Bound;

/// Inline capacity of a cursor's work-list before it spills to the heap.
const INLINE_TASKS: usize = 32;

/// Traversal order of a cursor.
///
/// # Examples
///
/// ```rust
/// use ordtree::persistent::{Direction, PersistentTreeMap};
///
/// let map = PersistentTreeMap::new().insert(1, "a").insert(2, "b");
/// let backward: Vec<&i32> = map.keys(Direction::Backward).collect();
/// assert_eq!(backward, vec![&2, &1]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ascending key order.
    #[default]
    Forward,
    /// Descending key order.
    Backward,
}

// =============================================================================
// Borrowing Cursor
// =============================================================================

enum Task<'a, K, V> {
    Visit(&'a Tree<K, V>),
    Yield(&'a Node<K, V>),
}

impl<K, V> Clone for Task<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Task<'_, K, V> {}

/// Work-list cursor borrowing the tree it walks.
pub(crate) struct Cursor<'a, K, V> {
    tasks: SmallVec<[Task<'a, K, V>; INLINE_TASKS]>,
    direction: Direction,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            direction: self.direction,
        }
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(root: &'a Tree<K, V>, direction: Direction) -> Self {
        let mut tasks = SmallVec::new();
        if !root.is_leaf() {
            tasks.push(Task::Visit(root));
        }
        Self { tasks, direction }
    }

    /// Forward cursor starting at the first key not below `lower`.
    ///
    /// Descends once from the root, queueing each node at or above the bound
    /// together with its right subtree, so seeking costs O(log n).
    pub(crate) fn seek<C>(root: &'a Tree<K, V>, lower: Bound<&K>, comparator: &C) -> Self
    where
        C: Comparator<K> + ?Sized,
    {
        let mut tasks = SmallVec::new();
        let mut current = root;
        while let Some(node) = current.node() {
            let below = match lower {
                Bound::Included(bound) => comparator.compare(&node.key, bound) == Ordering::Less,
                Bound::Excluded(bound) => {
                    comparator.compare(&node.key, bound) != Ordering::Greater
                }
                Bound::Unbounded => false,
            };
            if below {
                current = &node.right;
            } else {
                if !node.right.is_leaf() {
                    tasks.push(Task::Visit(&node.right));
                }
                tasks.push(Task::Yield(node));
                current = &node.left;
            }
        }
        Self {
            tasks,
            direction: Direction::Forward,
        }
    }

    /// Drops all pending work, moving the cursor to its terminal state.
    pub(crate) fn finish(&mut self) {
        self.tasks.clear();
    }

    pub(crate) fn next_node(&mut self) -> Option<&'a Node<K, V>> {
        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Yield(node) => return Some(node),
                Task::Visit(tree) => {
                    let Some(node) = tree.node() else {
                        continue;
                    };
                    let (near, far) = match self.direction {
                        Direction::Forward => (&node.left, &node.right),
                        Direction::Backward => (&node.right, &node.left),
                    };
                    if !far.is_leaf() {
                        self.tasks.push(Task::Visit(far));
                    }
                    self.tasks.push(Task::Yield(node));
                    if !near.is_leaf() {
                        self.tasks.push(Task::Visit(near));
                    }
                }
            }
        }
        None
    }

    pub(crate) fn next_entry(&mut self) -> Option<(&'a K, &'a V)> {
        self.next_node().map(|node| (&node.key, &node.value))
    }
}

// =============================================================================
// Owning Cursor
// =============================================================================

enum OwnedTask<K, V> {
    Visit(Tree<K, V>),
    Yield(ReferenceCounter<Node<K, V>>),
}

/// Work-list cursor holding its own reference-counted snapshot of the tree.
///
/// Entries are moved out of nodes that nothing else shares and cloned from
/// nodes that are still reachable elsewhere.
pub(crate) struct OwnedCursor<K, V> {
    tasks: Vec<OwnedTask<K, V>>,
    direction: Direction,
}

impl<K: Clone, V: Clone> OwnedCursor<K, V> {
    pub(crate) fn new(root: Tree<K, V>, direction: Direction) -> Self {
        let tasks = if root.is_leaf() {
            Vec::new()
        } else {
            vec![OwnedTask::Visit(root)]
        };
        Self { tasks, direction }
    }

    pub(crate) fn next_entry(&mut self) -> Option<(K, V)> {
        while let Some(task) = self.tasks.pop() {
            match task {
                OwnedTask::Yield(node) => {
                    return Some(match ReferenceCounter::try_unwrap(node) {
                        Ok(node) => (node.key, node.value),
                        Err(shared) => (shared.key.clone(), shared.value.clone()),
                    });
                }
                OwnedTask::Visit(Tree::Leaf) => {}
                OwnedTask::Visit(Tree::Node(node)) => {
                    let (near, far) = match self.direction {
                        Direction::Forward => (node.left.clone(), node.right.clone()),
                        Direction::Backward => (node.right.clone(), node.left.clone()),
                    };
                    if !far.is_leaf() {
                        self.tasks.push(OwnedTask::Visit(far));
                    }
                    self.tasks.push(OwnedTask::Yield(node));
                    if !near.is_leaf() {
                        self.tasks.push(OwnedTask::Visit(near));
                    }
                }
            }
        }
        None
    }
}
