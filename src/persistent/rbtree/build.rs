//! Linear-time construction from strictly ascending entries.

use super::{Color, Tree};

/// Builds a tree from entries already in strictly ascending key order.
///
/// The tree is split at the midpoint recursively, so sibling subtrees differ
/// in size by at most one. Every level above the deepest one is full; nodes
/// on a partially filled deepest level are colored red and all others black,
/// which gives every path the same black height.
pub(crate) fn from_sorted<K, V, I>(entries: I) -> Tree<K, V>
where
    I: IntoIterator<Item = (K, V)>,
    I::IntoIter: ExactSizeIterator,
{
    let mut entries = entries.into_iter();
    let count = entries.len();
    // floor(log2(count + 1)): the number of completely filled levels.
    let full_levels = usize::BITS - 1 - (count + 1).leading_zeros();
    build(&mut entries, count, 0, full_levels)
}

fn build<K, V, I>(entries: &mut I, count: usize, depth: u32, red_depth: u32) -> Tree<K, V>
where
    I: Iterator<Item = (K, V)>,
{
    if count == 0 {
        return Tree::Leaf;
    }
    let left_count = count / 2;
    let left = build(entries, left_count, depth + 1, red_depth);
    let Some((key, value)) = entries.next() else {
        panic!("red-black tree: bulk build ran out of entries before its reported length")
    };
    let right = build(entries, count - left_count - 1, depth + 1, red_depth);
    let color = if depth == red_depth {
        Color::Red
    } else {
        Color::Black
    };
    Tree::new(color, left, key, value, right)
}
