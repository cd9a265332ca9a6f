//! Total-order comparators injected into ordered collections.
//!
//! Every [`PersistentTreeMap`](super::PersistentTreeMap) and
//! [`PersistentTreeSet`](super::PersistentTreeSet) captures a comparator at
//! construction time and uses it for every operation on that collection and
//! on all collections derived from it.
//!
//! # Contract
//!
//! The comparator must be a consistent total order: antisymmetric,
//! transitive and stable for the lifetime of every tree it is used with.
//! Mixing comparators across operations on related trees is undefined and is
//! not detected at runtime; `check_invariants` on the collections can be used
//! in tests to catch such misuse.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::persistent::{Comparator, FnComparator, OrdComparator};
//! use std::cmp::Ordering;
//!
//! assert_eq!(OrdComparator.compare(&1, &2), Ordering::Less);
//!
//! let descending = FnComparator::new(|left: &i32, right: &i32| right.cmp(left));
//! assert_eq!(descending.compare(&1, &2), Ordering::Greater);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A total order over keys of type `K`.
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

impl<K: ?Sized, C: Comparator<K> + ?Sized> Comparator<K> for &C {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (**self).compare(left, right)
    }
}

/// Comparator using the key type's [`Ord`] implementation.
///
/// This is the default comparator of the ordered collections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OrdComparator;

impl<K: Ord + ?Sized> Comparator<K> for OrdComparator {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Comparator backed by a function or closure.
///
/// # Examples
///
/// ```rust
/// use ordtree::persistent::{FnComparator, PersistentTreeSet};
///
/// let by_length = FnComparator::new(|left: &String, right: &String| {
///     left.len().cmp(&right.len())
/// });
/// let set = PersistentTreeSet::with_comparator(by_length)
///     .insert("ccc".to_string())
///     .insert("a".to_string())
///     .insert("bb".to_string());
///
/// let ordered: Vec<&String> = set.iter().collect();
/// assert_eq!(ordered, vec!["a", "bb", "ccc"]);
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnComparator<F> {
    function: F,
}

impl<F> FnComparator<F> {
    /// Wraps a comparison function.
    #[inline]
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

impl<K: ?Sized, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        (self.function)(left, right)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("FnComparator")
    }
}
