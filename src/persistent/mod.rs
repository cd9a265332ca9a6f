//! Persistent (immutable) ordered collections.
//!
//! This module provides ordered collections built on one persistent
//! red-black tree engine:
//!
//! - [`PersistentTreeMap`]: Persistent ordered map
//! - [`PersistentTreeSet`]: Persistent ordered set
//!
//! Both are ordered by a [`Comparator`] fixed at construction time;
//! [`OrdComparator`] is the default and [`FnComparator`] adapts a closure.
//!
//! # Structural Sharing
//!
//! Every operation returns a new collection. Only the O(log N) nodes on the
//! path to a changed key are rebuilt; all other subtrees are shared with the
//! collection the result was derived from, and both stay valid.
//!
//! Union, intersection and difference are computed by splitting and joining
//! whole subtrees, which costs O(m log(n/m + 1)) for sizes m <= n and reuses
//! the subtrees that have no counterpart in the other operand.
//!
//! # Examples
//!
//! ## `PersistentTreeMap`
//!
//! ```rust
//! use ordtree::persistent::{Direction, PersistentTreeMap};
//!
//! let map = PersistentTreeMap::new()
//!     .insert(0, "Zero")
//!     .insert(2, "Two")
//!     .insert(1, "One");
//!
//! let entries: Vec<(&i32, &&str)> = map.entries(Direction::Forward).collect();
//! assert_eq!(entries, vec![(&0, &"Zero"), (&1, &"One"), (&2, &"Two")]);
//!
//! // Structural sharing: the original map is preserved
//! let smaller = map.delete(&1);
//! assert_eq!(smaller.len(), 2);
//! assert_eq!(map.len(), 3);
//! assert_eq!(map.get(&42), None);
//! ```
//!
//! ## `PersistentTreeSet`
//!
//! ```rust
//! use ordtree::persistent::PersistentTreeSet;
//!
//! let first: PersistentTreeSet<i32> = (0..3).collect();
//! let second: PersistentTreeSet<i32> = (1..4).collect();
//!
//! assert_eq!(first.union(&second).len(), 4);
//! assert_eq!(first.intersection(&second).len(), 2);
//! assert!(first.intersection(&second).is_subset(&first));
//! ```
//!
//! # Thread Safety
//!
//! With the `arc` feature, shared nodes are reference counted with
//! `std::sync::Arc` and the collections are `Send + Sync` whenever their
//! keys, values and comparator are.

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparator;
mod cursor;
mod rbtree;
mod treemap;
mod treeset;

pub use comparator::Comparator;
pub use comparator::FnComparator;
pub use comparator::OrdComparator;
pub use cursor::Direction;
pub use rbtree::validate::InvariantViolation;
pub use treemap::PersistentTreeMap;
pub use treemap::PersistentTreeMapIntoIterator;
pub use treemap::PersistentTreeMapIterator;
pub use treemap::PersistentTreeMapRangeIterator;
pub use treeset::PersistentTreeSet;
pub use treeset::PersistentTreeSetIntoIterator;
pub use treeset::PersistentTreeSetIterator;
pub use treeset::PersistentTreeSetRangeIterator;

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeMap<i32, String>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentTreeSet<String>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeMap<i32, String>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentTreeSet<String>: Send, Sync);

// Hashing follows `Ord`, so only `OrdComparator` collections are `Hash`.
static_assertions::assert_impl_all!(PersistentTreeMap<String, i32>: std::hash::Hash);
static_assertions::assert_impl_all!(PersistentTreeSet<String>: std::hash::Hash);
static_assertions::assert_not_impl_any!(
    PersistentTreeMap<String, i32, FnComparator<fn(&String, &String) -> std::cmp::Ordering>>:
        std::hash::Hash
);
static_assertions::assert_not_impl_any!(
    PersistentTreeSet<String, FnComparator<fn(&String, &String) -> std::cmp::Ordering>>:
        std::hash::Hash
);

// =============================================================================
// Tests
// =============================================================================
