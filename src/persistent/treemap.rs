//! Persistent (immutable) ordered map based on a red-black tree.
//!
//! This module provides [`PersistentTreeMap`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentTreeMap` is a persistent red-black tree ordered by a
//! [`Comparator`] chosen at construction time:
//!
//! - O(log N) get
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) min/max
//! - O(log N + k) range queries where k is the number of results
//! - O(m log(n/m + 1)) union, intersection and difference
//! - O(1) len and `is_empty`
//!
//! All operations return new maps without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::persistent::{Direction, PersistentTreeMap};
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys(Direction::Forward).collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Range queries
//! let range: Vec<(&i32, &&str)> = map.range(1..3).collect();
//! assert_eq!(range.len(), 2); // 1 and 2
//! ```

use super::comparator::{Comparator, OrdComparator};
use super::cursor::{Cursor, Direction, OwnedCursor};
use super::rbtree::balance::blacken;
use super::rbtree::validate::{InvariantViolation, check_tree};
use super::rbtree::{self, Tree, algebra, build, join};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Bound, RangeBounds};
use tracing::{debug, trace};

// =============================================================================
// PersistentTreeMap Definition
// =============================================================================

/// A persistent (immutable) ordered map based on a red-black tree.
///
/// `PersistentTreeMap` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// Keys are ordered by the comparator `C`, which defaults to
/// [`OrdComparator`]. Every map derived from this one keeps the same
/// comparator. Binary operations such as [`union`](Self::union) use the
/// comparator of the receiver; both operands must be ordered the same way.
///
/// # Time Complexity
///
/// | Operation      | Complexity         |
/// |----------------|--------------------|
/// | `new`          | O(1)               |
/// | `get`          | O(log N)           |
/// | `insert`       | O(log N)           |
/// | `remove`       | O(log N)           |
/// | `contains_key` | O(log N)           |
/// | `min`/`max`    | O(log N)           |
/// | `range`        | O(log N + k)       |
/// | `union`        | O(m log(n/m + 1))  |
/// | `len`          | O(1)               |
/// | `is_empty`     | O(1)               |
///
/// # Examples
///
/// ```rust
/// use ordtree::persistent::{Direction, PersistentTreeMap};
///
/// let map = PersistentTreeMap::singleton(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// // Ordered iteration
/// let map = PersistentTreeMap::new()
///     .insert(3, "three")
///     .insert(1, "one")
///     .insert(2, "two");
///
/// let keys: Vec<&i32> = map.keys(Direction::Forward).collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
/// ```
pub struct PersistentTreeMap<K, V, C = OrdComparator> {
    /// Root of the tree; always black
    root: Tree<K, V>,
    /// Number of entries
    length: usize,
    /// Total order on keys
    comparator: C,
}

impl<K, V, C: Clone> Clone for PersistentTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(OrdComparator)
    }
}

impl<K: Clone + Ord, V: Clone> PersistentTreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }
}

impl<K, V, C> PersistentTreeMap<K, V, C> {
    /// Creates a new empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::{Direction, FnComparator, PersistentTreeMap};
    ///
    /// let descending = FnComparator::new(|left: &i32, right: &i32| right.cmp(left));
    /// let map = PersistentTreeMap::with_comparator(descending)
    ///     .insert(1, "one")
    ///     .insert(3, "three")
    ///     .insert(2, "two");
    ///
    /// let keys: Vec<&i32> = map.keys(Direction::Forward).collect();
    /// assert_eq!(keys, vec![&3, &2, &1]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: Tree::Leaf,
            length: 0,
            comparator,
        }
    }

    /// Returns the comparator that orders this map.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let empty: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = empty.insert(1, "one".to_string());
    /// assert!(!non_empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one");
    /// assert_eq!(map.min_entry(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min_entry(&self) -> Option<(&K, &V)> {
        self.root.first()
    }

    /// Returns the entry with the largest key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max_entry(&self) -> Option<(&K, &V)> {
        self.root.last()
    }

    /// Returns an iterator over entries in ascending key order.
    pub fn iter(&self) -> PersistentTreeMapIterator<'_, K, V> {
        self.entries(Direction::Forward)
    }

    /// Returns an iterator over entries in the given direction.
    ///
    /// The iterator is a snapshot: maps derived from this one afterwards do
    /// not affect it.
    ///
    /// # Complexity
    ///
    /// O(1) to create, O(N) to exhaust, O(log N) space while suspended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::{Direction, PersistentTreeMap};
    ///
    /// let map: PersistentTreeMap<i32, &str> =
    ///     [(0, "Zero"), (2, "Two"), (1, "One")].into_iter().collect();
    ///
    /// let backward: Vec<(&i32, &&str)> = map.entries(Direction::Backward).collect();
    /// assert_eq!(backward, vec![(&2, &"Two"), (&1, &"One"), (&0, &"Zero")]);
    /// ```
    pub fn entries(&self, direction: Direction) -> PersistentTreeMapIterator<'_, K, V> {
        PersistentTreeMapIterator {
            cursor: Cursor::new(&self.root, direction),
            remaining: self.length,
        }
    }

    /// Returns an iterator over keys in the given direction.
    pub fn keys(&self, direction: Direction) -> impl ExactSizeIterator<Item = &K> + FusedIterator {
        self.entries(direction).map(|(key, _)| key)
    }

    /// Returns an iterator over values in the given direction, ordered by
    /// their keys.
    pub fn values(
        &self,
        direction: Direction,
    ) -> impl ExactSizeIterator<Item = &V> + FusedIterator {
        self.entries(direction).map(|(_, value)| value)
    }

    /// Folds entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, 10).insert(2, 20).insert(3, 30);
    /// let sum = map.fold_left(0, |accumulator, _, value| accumulator + value);
    /// assert_eq!(sum, 60);
    /// ```
    pub fn fold_left<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &K, &V) -> B,
    {
        self.entries(Direction::Forward)
            .fold(init, |accumulator, (key, value)| {
                function(accumulator, key, value)
            })
    }

    /// Folds entries in descending key order, starting from the largest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "a").insert(2, "b").insert(3, "c");
    /// let joined = map.fold_right(String::new(), |_, value, accumulator| accumulator + *value);
    /// assert_eq!(joined, "cba");
    /// ```
    pub fn fold_right<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&K, &V, B) -> B,
    {
        self.entries(Direction::Backward)
            .fold(init, |accumulator, (key, value)| {
                function(key, value, accumulator)
            })
    }

    /// Returns `true` if every entry satisfies the predicate.
    ///
    /// Stops at the first entry that does not. An empty map satisfies any
    /// predicate.
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter().all(|(key, value)| predicate(key, value))
    }

    /// Returns `true` if some entry satisfies the predicate.
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter().any(|(key, value)| predicate(key, value))
    }

    /// Applies `transform` to every value, keeping keys and comparator.
    ///
    /// The result has exactly the shape of this map, so no comparisons are
    /// made.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, 10).insert(2, 20);
    /// let doubled = map.map_values(|value| value * 2);
    /// assert_eq!(doubled.get(&2), Some(&40));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut transform: F) -> PersistentTreeMap<K, W, C>
    where
        K: Clone,
        C: Clone,
        F: FnMut(&V) -> W,
    {
        self.map_with_key(|_, value| transform(value))
    }

    /// Like [`map_values`](Self::map_values), but `transform` also sees the
    /// key of each entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert("a", 1).insert("b", 2);
    /// let labelled = map.map_with_key(|key, value| format!("{key}={value}"));
    /// assert_eq!(labelled.get(&"b"), Some(&"b=2".to_string()));
    /// ```
    #[must_use]
    pub fn map_with_key<W, F>(&self, mut transform: F) -> PersistentTreeMap<K, W, C>
    where
        K: Clone,
        C: Clone,
        F: FnMut(&K, &V) -> W,
    {
        PersistentTreeMap {
            root: self.root.map_values(&mut transform),
            length: self.length,
            comparator: self.comparator.clone(),
        }
    }

    /// Checks the red-black invariants and the cached length.
    ///
    /// A map built only through this API always passes; a failure means the
    /// comparator is not a consistent total order.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// assert_eq!(map.check_invariants(), Ok(()));
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        C: Comparator<K>,
    {
        let outcome = check_tree(&self.root, &self.comparator).and_then(|counted| {
            if counted == self.length {
                Ok(())
            } else {
                Err(InvariantViolation::LengthMismatch {
                    cached: self.length,
                    counted,
                })
            }
        });
        if let Err(violation) = &outcome {
            debug!(%violation, length = self.length, "tree map failed its invariant check");
        }
        outcome
    }
}

impl<K, V, C> PersistentTreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Clone,
{
    fn with_root(&self, root: Tree<K, V>, length: usize) -> Self {
        Self {
            root,
            length,
            comparator: self.comparator.clone(),
        }
    }

    /// Builds a map ordered by `comparator` from an iterator of entries.
    ///
    /// When the keys arrive in strictly ascending order the tree is built
    /// directly in O(N); otherwise entries are inserted one by one in
    /// O(N log N), and the last value given for a key wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::{Direction, FnComparator, PersistentTreeMap};
    ///
    /// let descending = FnComparator::new(|left: &i32, right: &i32| right.cmp(left));
    /// let map = PersistentTreeMap::from_iter_with([(1, 'a'), (3, 'c'), (2, 'b')], descending);
    /// let values: String = map.values(Direction::Forward).collect();
    /// assert_eq!(values, "cba");
    /// ```
    #[must_use]
    pub fn from_iter_with<I>(entries: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        let ascending = entries
            .windows(2)
            .all(|pair| comparator.compare(&pair[0].0, &pair[1].0) == Ordering::Less);

        if ascending {
            trace!(entries = entries.len(), "bulk building tree map from ascending entries");
            let length = entries.len();
            Self {
                root: build::from_sorted(entries),
                length,
                comparator,
            }
        } else {
            trace!(entries = entries.len(), "building tree map by repeated insertion");
            entries
                .into_iter()
                .fold(Self::with_comparator(comparator), |map, (key, value)| {
                    map.put(key, value)
                })
        }
    }

    /// Inserts by value, so a uniquely owned path is reused instead of copied.
    fn put(self, key: K, value: V) -> Self {
        let (root, previous) =
            rbtree::insert(self.root, key, value, &self.comparator, |_, new| new);
        Self {
            root,
            length: self.length + usize::from(previous.is_none()),
            comparator: self.comparator,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert("hello".to_string(), 42);
    /// assert_eq!(map.get(&"hello".to_string()), Some(&42));
    /// assert_eq!(map.get(&"world".to_string()), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.root
            .get(key, &self.comparator)
            .map(|(_, value)| value)
    }

    /// Returns the stored key and value for a key that compares equal.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.root.get(key, &self.comparator)
    }

    /// Returns `true` if the map contains the key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns a new map with the key bound to `value`. If the key already
    /// exists its value is replaced.
    ///
    /// # Complexity
    ///
    /// O(log N) time and O(log N) new nodes
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one");
    /// let map2 = map1.insert(2, "two");
    ///
    /// assert_eq!(map1.len(), 1); // Original unchanged
    /// assert_eq!(map2.len(), 2);
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.replace(key, value).0
    }

    /// Inserts a key-value pair, resolving a conflict with an existing value.
    ///
    /// If the key is present, `resolver(old, new)` produces the stored value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let counts = PersistentTreeMap::new()
    ///     .insert_with("a", 1, |old, new| old + new)
    ///     .insert_with("a", 1, |old, new| old + new);
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// ```
    #[must_use]
    pub fn insert_with<F>(&self, key: K, value: V, resolver: F) -> Self
    where
        F: FnOnce(&V, V) -> V,
    {
        let (root, previous) =
            rbtree::insert(self.root.clone(), key, value, &self.comparator, resolver);
        self.with_root(root, self.length + usize::from(previous.is_none()))
    }

    /// Inserts a key-value pair and returns the value it replaced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one");
    /// let (map, previous) = map.replace(1, "uno");
    /// assert_eq!(previous, Some("one"));
    /// assert_eq!(map.get(&1), Some(&"uno"));
    /// ```
    #[must_use]
    pub fn replace(&self, key: K, value: V) -> (Self, Option<V>) {
        let (root, previous) =
            rbtree::insert(self.root.clone(), key, value, &self.comparator, |_, new| new);
        let length = self.length + usize::from(previous.is_none());
        (self.with_root(root, length), previous)
    }

    /// Removes a key, returning the new map.
    ///
    /// Removing an absent key returns a map that shares the original tree.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
    /// let removed = map.delete(&1);
    /// assert_eq!(removed.len(), 1);
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn delete(&self, key: &K) -> Self {
        self.remove(key).0
    }

    /// Removes a key, returning the new map and the removed value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, "one");
    /// let (map, removed) = map.remove(&1);
    /// assert_eq!(removed, Some("one"));
    /// assert!(map.is_empty());
    ///
    /// let (_, removed) = map.remove(&1);
    /// assert_eq!(removed, None);
    /// ```
    #[must_use]
    pub fn remove(&self, key: &K) -> (Self, Option<V>) {
        match rbtree::remove(&self.root, key, &self.comparator) {
            Some((root, removed)) => (self.with_root(root, self.length - 1), Some(removed)),
            None => (self.clone(), None),
        }
    }

    /// Returns the union of two maps; on a shared key the value from
    /// `other` is kept.
    ///
    /// # Complexity
    ///
    /// O(m log(n/m + 1)) where m <= n are the sizes of the two maps
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
    /// let map2 = PersistentTreeMap::new().insert(2, "TWO").insert(3, "three");
    /// let merged = map1.union(&map2);
    /// assert_eq!(merged.get(&1), Some(&"one"));
    /// assert_eq!(merged.get(&2), Some(&"TWO")); // From map2
    /// assert_eq!(merged.get(&3), Some(&"three"));
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.union_with(other, |_, _, other_value| other_value)
    }

    /// Returns the union of two maps with a custom conflict resolver.
    ///
    /// For every shared key, `resolver(key, self_value, other_value)` gives
    /// the stored value. The resolver is called in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, 100).insert(2, 200);
    /// let map2 = PersistentTreeMap::new().insert(2, 50).insert(3, 300);
    /// let merged = map1.union_with(&map2, |_, left, right| left.max(right));
    /// assert_eq!(merged.get(&2), Some(&200));
    /// assert_eq!(merged.len(), 3);
    /// ```
    #[must_use]
    pub fn union_with<F>(&self, other: &Self, mut resolver: F) -> Self
    where
        F: FnMut(&K, V, V) -> V,
    {
        let (root, shared) = algebra::union(
            self.root.clone(),
            other.root.clone(),
            &self.comparator,
            &mut resolver,
        );
        let length = self.length + other.length - shared;
        trace!(left = self.length, right = other.length, result = length, "tree map union");
        self.with_root(blacken(root), length)
    }

    /// Returns the entries of `self` whose keys are also in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
    /// let map2 = PersistentTreeMap::new().insert(2, "TWO").insert(3, "three");
    /// let common = map1.intersection(&map2);
    /// assert_eq!(common.len(), 1);
    /// assert_eq!(common.get(&2), Some(&"two"));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.intersection_with(other, |_, self_value, _| self_value)
    }

    /// Returns the entries whose keys are in both maps, combining their
    /// values with `resolver(key, self_value, other_value)`.
    #[must_use]
    pub fn intersection_with<F>(&self, other: &Self, mut resolver: F) -> Self
    where
        F: FnMut(&K, V, V) -> V,
    {
        let (root, length) = algebra::intersect(
            self.root.clone(),
            other.root.clone(),
            &self.comparator,
            &mut resolver,
        );
        trace!(left = self.length, right = other.length, result = length, "tree map intersection");
        self.with_root(blacken(root), length)
    }

    /// Returns the entries of `self` whose keys are not in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one").insert(2, "two");
    /// let map2 = PersistentTreeMap::new().insert(2, "TWO");
    /// let only_left = map1.difference(&map2);
    /// assert_eq!(only_left.len(), 1);
    /// assert!(only_left.contains_key(&1));
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let (root, removed) =
            algebra::difference(self.root.clone(), other.root.clone(), &self.comparator);
        let length = self.length - removed;
        trace!(left = self.length, right = other.length, result = length, "tree map difference");
        self.with_root(blacken(root), length)
    }

    /// Splits the map around `key`.
    ///
    /// Returns the entries below `key`, the value bound to `key` if any, and
    /// the entries above `key`.
    ///
    /// # Complexity
    ///
    /// O(log N) to split, plus O(k) to count the k entries below `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// let (below, found, above) = map.split(&2);
    /// assert_eq!(below.len(), 1);
    /// assert_eq!(found, Some('b'));
    /// assert_eq!(above.len(), 1);
    /// ```
    #[must_use]
    pub fn split(&self, key: &K) -> (Self, Option<V>, Self) {
        let (less, found, greater) = join::split(key, self.root.clone(), &self.comparator);
        let less = blacken(less);
        let greater = blacken(greater);
        let less_length = less.size();
        let greater_length = self.length - less_length - usize::from(found.is_some());
        (
            self.with_root(less, less_length),
            found,
            self.with_root(greater, greater_length),
        )
    }

    /// Returns an iterator over entries whose keys fall within `range`, in
    /// ascending order.
    ///
    /// The range is specified using Rust's range syntax:
    /// - `a..b` - from a (inclusive) to b (exclusive)
    /// - `a..=b` - from a (inclusive) to b (inclusive)
    /// - `a..` - from a (inclusive) to the end
    /// - `..b` - from the start to b (exclusive)
    /// - `..` - all entries
    ///
    /// An empty or inverted range yields nothing.
    ///
    /// # Complexity
    ///
    /// O(log N + k) where k is the number of entries in the range
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two")
    ///     .insert(3, "three")
    ///     .insert(4, "four")
    ///     .insert(5, "five");
    ///
    /// let range: Vec<(&i32, &&str)> = map.range(2..=4).collect();
    /// assert_eq!(range.len(), 3); // 2, 3, 4
    /// ```
    pub fn range<R>(&self, range: R) -> PersistentTreeMapRangeIterator<'_, K, V, C>
    where
        R: RangeBounds<K>,
    {
        PersistentTreeMapRangeIterator {
            cursor: Cursor::seek(&self.root, range.start_bound(), &self.comparator),
            upper: range.end_bound().cloned(),
            comparator: &self.comparator,
        }
    }

    /// Keeps the entries for which `filter_transform` returns `Some`,
    /// replacing their values.
    ///
    /// # Complexity
    ///
    /// O(N); the surviving entries are already in order, so the result is
    /// built directly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(1, 10).insert(2, 20).insert(3, 30);
    /// let odd = map.filter_map(|key, value| (key % 2 == 1).then(|| value / 10));
    /// assert_eq!(odd.len(), 2);
    /// assert_eq!(odd.get(&3), Some(&3));
    /// ```
    #[must_use]
    pub fn filter_map<W, F>(&self, mut filter_transform: F) -> PersistentTreeMap<K, W, C>
    where
        F: FnMut(&K, &V) -> Option<W>,
    {
        let kept: Vec<(K, W)> = self
            .iter()
            .filter_map(|(key, value)| {
                filter_transform(key, value).map(|new_value| (key.clone(), new_value))
            })
            .collect();
        PersistentTreeMap {
            length: kept.len(),
            root: build::from_sorted(kept),
            comparator: self.comparator.clone(),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`PersistentTreeMap`].
pub struct PersistentTreeMapIterator<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

impl<K, V> Clone for PersistentTreeMapIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for PersistentTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.next_entry()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PersistentTreeMapIterator<'_, K, V> {}

/// A range iterator over key-value pairs of a [`PersistentTreeMap`].
pub struct PersistentTreeMapRangeIterator<'a, K, V, C = OrdComparator> {
    cursor: Cursor<'a, K, V>,
    upper: Bound<K>,
    comparator: &'a C,
}

impl<'a, K, V, C: Comparator<K>> Iterator for PersistentTreeMapRangeIterator<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.cursor.next_entry()?;
        let within = match &self.upper {
            Bound::Included(bound) => self.comparator.compare(key, bound) != Ordering::Greater,
            Bound::Excluded(bound) => self.comparator.compare(key, bound) == Ordering::Less,
            Bound::Unbounded => true,
        };
        if within {
            Some((key, value))
        } else {
            self.cursor.finish();
            None
        }
    }
}

impl<K, V, C: Comparator<K>> FusedIterator for PersistentTreeMapRangeIterator<'_, K, V, C> {}

/// An owning iterator over key-value pairs of a [`PersistentTreeMap`].
///
/// Holds its own reference to the tree, so it stays valid after the map it
/// came from is dropped.
pub struct PersistentTreeMapIntoIterator<K, V> {
    cursor: OwnedCursor<K, V>,
    remaining: usize,
}

impl<K: Clone, V: Clone> Iterator for PersistentTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.next_entry()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for PersistentTreeMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K: Clone, V: Clone> FusedIterator for PersistentTreeMapIntoIterator<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Default> Default for PersistentTreeMap<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C> FromIterator<(K, V)> for PersistentTreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_iter_with(iter, C::default())
    }
}

impl<K: Clone, V: Clone, C> IntoIterator for PersistentTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = PersistentTreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentTreeMapIntoIterator {
            cursor: OwnedCursor::new(self.root, Direction::Forward),
            remaining: self.length,
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a PersistentTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentTreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two maps are equal when they hold the same keys, in the receiver's
/// order, bound to equal values. Tree shapes may differ.
impl<K, V: PartialEq, C: Comparator<K>> PartialEq for PersistentTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .zip(other.iter())
                .all(|((key, value), (other_key, other_value))| {
                    self.comparator.compare(key, other_key) == Ordering::Equal
                        && value == other_value
                })
    }
}

impl<K, V: Eq, C: Comparator<K>> Eq for PersistentTreeMap<K, V, C> {}

/// Computes a hash value for this tree map.
///
/// The hash is computed by first hashing the length, then hashing each
/// (key, value) pair in key order, so equal maps hash equally regardless of
/// how they were built.
///
/// Only maps ordered by [`Ord`] are hashable: a custom comparator may call
/// keys equal that [`Hash`] tells apart.
///
/// # Examples
///
/// ```rust
/// use ordtree::persistent::PersistentTreeMap;
/// use std::collections::HashMap;
///
/// let mut outer: HashMap<PersistentTreeMap<i32, String>, &str> = HashMap::new();
/// let key = PersistentTreeMap::new()
///     .insert(1, "one".to_string())
///     .insert(2, "two".to_string());
/// outer.insert(key.clone(), "value");
/// assert_eq!(outer.get(&key), Some(&"value"));
/// ```
impl<K: Ord + Hash, V: Hash> Hash for PersistentTreeMap<K, V, OrdComparator> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for PersistentTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for PersistentTreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for PersistentTreeMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentTreeMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> PersistentTreeMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<K, V, C> PersistentTreeMapVisitor<K, V, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for PersistentTreeMapVisitor<K, V, C>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de> + Clone,
    C: Comparator<K> + Clone + Default,
{
    type Value = PersistentTreeMap<K, V, C>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // Serialized maps are in key order, which takes the linear bulk build.
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Ok(PersistentTreeMap::from_iter_with(entries, C::default()))
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for PersistentTreeMap<K, V, C>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de> + Clone,
    C: Comparator<K> + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentTreeMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
