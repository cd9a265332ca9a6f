//! Invariant checking for red-black trees.
//!
//! Used by the test suite after every operation and exposed through
//! `check_invariants` on the collections, where it is the only way to detect
//! an inconsistent comparator.

use super::{Color, Tree};
use crate::persistent::comparator::Comparator;
use std::cmp::Ordering;
use std::fmt;

/// A broken red-black tree invariant.
///
/// # Examples
///
/// ```rust
/// use ordtree::persistent::InvariantViolation;
///
/// let violation = InvariantViolation::LengthMismatch { cached: 3, counted: 2 };
/// assert_eq!(
///     format!("{violation}"),
///     "cached length 3 does not match the 2 entries in the tree"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedRedViolation,
    /// Two sibling subtrees have different black heights.
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// Keys are not in strictly ascending order under the comparator.
    OrderViolation,
    /// The cached length differs from the number of entries.
    LengthMismatch {
        /// The length the collection reports.
        cached: usize,
        /// The number of entries found by traversal.
        counted: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root node is red"),
            Self::RedRedViolation => write!(formatter, "red node has a red child"),
            Self::BlackHeightMismatch { left, right } => write!(
                formatter,
                "black height mismatch: left subtree {left}, right subtree {right}"
            ),
            Self::OrderViolation => write!(formatter, "keys are not in strictly ascending order"),
            Self::LengthMismatch { cached, counted } => write!(
                formatter,
                "cached length {cached} does not match the {counted} entries in the tree"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Checks invariants 1-4 and returns the number of entries.
pub(crate) fn check_tree<K, V, C>(tree: &Tree<K, V>, comparator: &C) -> Result<usize, InvariantViolation>
where
    C: Comparator<K> + ?Sized,
{
    if tree.is_red() {
        return Err(InvariantViolation::RedRoot);
    }
    check_subtree(tree, None, None, comparator).map(|(_, count)| count)
}

/// Returns `(black_height, count)` of a subtree whose keys must lie strictly
/// between `lower` and `upper`.
fn check_subtree<K, V, C>(
    tree: &Tree<K, V>,
    lower: Option<&K>,
    upper: Option<&K>,
    comparator: &C,
) -> Result<(usize, usize), InvariantViolation>
where
    C: Comparator<K> + ?Sized,
{
    let Some(node) = tree.node() else {
        return Ok((0, 0));
    };

    let above_lower =
        lower.is_none_or(|bound| comparator.compare(bound, &node.key) == Ordering::Less);
    let below_upper =
        upper.is_none_or(|bound| comparator.compare(&node.key, bound) == Ordering::Less);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::OrderViolation);
    }

    if node.color == Color::Red && (node.left.is_red() || node.right.is_red()) {
        return Err(InvariantViolation::RedRedViolation);
    }

    let (left_height, left_count) = check_subtree(&node.left, lower, Some(&node.key), comparator)?;
    let (right_height, right_count) =
        check_subtree(&node.right, Some(&node.key), upper, comparator)?;
    if left_height != right_height {
        return Err(InvariantViolation::BlackHeightMismatch {
            left: left_height,
            right: right_height,
        });
    }

    let own_height = usize::from(node.color == Color::Black);
    Ok((left_height + own_height, left_count + 1 + right_count))
}
