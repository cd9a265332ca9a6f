//! Persistent (immutable) ordered set based on a red-black tree.
//!
//! [`PersistentTreeSet`] is a [`PersistentTreeMap`] whose values are `()`.
//! The unit value occupies no space, so each node carries only its color,
//! its element and its two children.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::persistent::PersistentTreeSet;
//!
//! let first: PersistentTreeSet<i32> = [0, 1, 2].into_iter().collect();
//! let second: PersistentTreeSet<i32> = [1, 2, 3].into_iter().collect();
//!
//! let union = first.union(&second);
//! assert_eq!(union.iter().collect::<Vec<_>>(), vec![&0, &1, &2, &3]);
//!
//! let intersection = first.intersection(&second);
//! assert_eq!(intersection.iter().collect::<Vec<_>>(), vec![&1, &2]);
//!
//! let difference = first.difference(&second);
//! assert_eq!(difference.iter().collect::<Vec<_>>(), vec![&0]);
//! ```

use super::comparator::{Comparator, OrdComparator};
use super::cursor::Direction;
use super::rbtree::validate::InvariantViolation;
use super::treemap::{
    PersistentTreeMap, PersistentTreeMapIntoIterator, PersistentTreeMapIterator,
    PersistentTreeMapRangeIterator,
};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::RangeBounds;

// =============================================================================
// PersistentTreeSet Definition
// =============================================================================

/// A persistent (immutable) ordered set based on a red-black tree.
///
/// Elements are ordered by the comparator `C`, which defaults to
/// [`OrdComparator`]. Set operations take the comparator of the receiver;
/// both operands must be ordered the same way.
///
/// # Time Complexity
///
/// | Operation                 | Complexity         |
/// |---------------------------|--------------------|
/// | `contains`                | O(log N)           |
/// | `insert`                  | O(log N)           |
/// | `remove`                  | O(log N)           |
/// | `union`/`intersection`    | O(m log(n/m + 1))  |
/// | `difference`              | O(m log(n/m + 1))  |
/// | `is_subset`               | O(m log n)         |
/// | `len`                     | O(1)               |
///
/// # Examples
///
/// ```rust
/// use ordtree::persistent::PersistentTreeSet;
///
/// let set = PersistentTreeSet::new().insert(3).insert(1).insert(2);
/// assert!(set.contains(&2));
/// assert_eq!(set.min(), Some(&1));
/// assert_eq!(set.max(), Some(&3));
/// ```
pub struct PersistentTreeSet<T, C = OrdComparator> {
    inner: PersistentTreeMap<T, (), C>,
}

impl<T, C: Clone> Clone for PersistentTreeSet<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> PersistentTreeSet<T> {
    /// Creates a new empty set ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = PersistentTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: PersistentTreeMap::new(),
        }
    }
}

impl<T: Clone + Ord> PersistentTreeSet<T> {
    /// Creates a set containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }
}

impl<T, C> PersistentTreeSet<T, C> {
    /// Creates a new empty set ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            inner: PersistentTreeMap::with_comparator(comparator),
        }
    }

    /// Returns the comparator that orders this set.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.inner.comparator()
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.inner.min_entry().map(|(element, ())| element)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.inner.max_entry().map(|(element, ())| element)
    }

    /// Returns an iterator over elements in ascending order.
    pub fn iter(&self) -> PersistentTreeSetIterator<'_, T> {
        self.values(Direction::Forward)
    }

    /// Returns an iterator over elements in the given direction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::{Direction, PersistentTreeSet};
    ///
    /// let set: PersistentTreeSet<char> = "hello".chars().collect();
    /// let backward: String = set.values(Direction::Backward).collect();
    /// assert_eq!(backward, "olhe");
    /// ```
    pub fn values(&self, direction: Direction) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            inner: self.inner.entries(direction),
        }
    }

    /// Folds elements in ascending order.
    pub fn fold_left<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.inner
            .fold_left(init, |accumulator, element, ()| function(accumulator, element))
    }

    /// Folds elements in descending order, starting from the largest.
    pub fn fold_right<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&T, B) -> B,
    {
        self.inner
            .fold_right(init, |element, (), accumulator| function(element, accumulator))
    }

    /// Returns `true` if every element satisfies the predicate.
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(|element| predicate(element))
    }

    /// Returns `true` if some element satisfies the predicate.
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(|element| predicate(element))
    }

    /// Checks the red-black invariants and the cached length.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        C: Comparator<T>,
    {
        self.inner.check_invariants()
    }
}

impl<T, C> PersistentTreeSet<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone,
{
    const fn from_inner(inner: PersistentTreeMap<T, (), C>) -> Self {
        Self { inner }
    }

    /// Builds a set ordered by `comparator` from an iterator of elements.
    ///
    /// Strictly ascending input is built in O(N); anything else is inserted
    /// element by element, dropping duplicates.
    #[must_use]
    pub fn from_iter_with<I>(elements: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_inner(PersistentTreeMap::from_iter_with(
            elements.into_iter().map(|element| (element, ())),
            comparator,
        ))
    }

    /// Returns `true` if the set contains the element.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.inner.contains_key(element)
    }

    /// Returns the stored element that compares equal to `element`.
    #[must_use]
    pub fn get(&self, element: &T) -> Option<&T> {
        self.inner
            .get_key_value(element)
            .map(|(stored, ())| stored)
    }

    /// Adds an element.
    ///
    /// If an equal element is already present the set is returned as is,
    /// sharing its whole tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let set1 = PersistentTreeSet::new().insert(1);
    /// let set2 = set1.insert(2);
    /// assert_eq!(set1.len(), 1); // Original unchanged
    /// assert_eq!(set2.len(), 2);
    /// assert_eq!(set2.insert(2), set2);
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        if self.contains(&element) {
            self.clone()
        } else {
            Self::from_inner(self.inner.insert(element, ()))
        }
    }

    /// Removes an element, returning the new set.
    #[must_use]
    pub fn delete(&self, element: &T) -> Self {
        Self::from_inner(self.inner.delete(element))
    }

    /// Removes an element, returning the new set and whether the element
    /// was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let set = PersistentTreeSet::new().insert(1);
    /// let (set, removed) = set.remove(&1);
    /// assert!(removed);
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn remove(&self, element: &T) -> (Self, bool) {
        let (inner, removed) = self.inner.remove(element);
        (Self::from_inner(inner), removed.is_some())
    }

    /// Returns the elements in either set.
    ///
    /// # Complexity
    ///
    /// O(m log(n/m + 1)) where m <= n are the sizes of the two sets
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_inner(self.inner.union_with(&other.inner, |_, (), ()| ()))
    }

    /// Returns the elements in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::from_inner(self.inner.intersection(&other.inner))
    }

    /// Returns the elements of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self::from_inner(self.inner.difference(&other.inner))
    }

    /// Returns the elements in exactly one of the two sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let first: PersistentTreeSet<i32> = [1, 2, 3].into_iter().collect();
    /// let second: PersistentTreeSet<i32> = [2, 3, 4].into_iter().collect();
    /// let only_one = first.symmetric_difference(&second);
    /// assert_eq!(only_one.iter().collect::<Vec<_>>(), vec![&1, &4]);
    /// ```
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Complexity
    ///
    /// O(m log n) where m is the size of `self` and n the size of `other`
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the sets have no element in common.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !smaller.iter().any(|element| larger.contains(element))
    }

    /// Returns `true` if both sets hold the same elements.
    ///
    /// Equivalent to `==`, computed as a membership scan.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }

    /// Splits the set around `element`.
    ///
    /// Returns the elements below it, whether it was present, and the
    /// elements above it.
    #[must_use]
    pub fn split(&self, element: &T) -> (Self, bool, Self) {
        let (less, found, greater) = self.inner.split(element);
        (
            Self::from_inner(less),
            found.is_some(),
            Self::from_inner(greater),
        )
    }

    /// Returns an iterator over elements within `range`, in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (0..10).collect();
    /// let middle: Vec<&i32> = set.range(3..6).collect();
    /// assert_eq!(middle, vec![&3, &4, &5]);
    /// ```
    pub fn range<R>(&self, range: R) -> PersistentTreeSetRangeIterator<'_, T, C>
    where
        R: RangeBounds<T>,
    {
        PersistentTreeSetRangeIterator {
            inner: self.inner.range(range),
        }
    }

    /// Keeps the elements that satisfy the predicate.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        Self::from_inner(
            self.inner
                .filter_map(|element, ()| predicate(element).then_some(())),
        )
    }

    /// Applies `transform` to every element and collects the results into a
    /// set ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = [-2, -1, 0, 1, 2].into_iter().collect();
    /// let squares = set.map(|element| element * element);
    /// assert_eq!(squares.iter().copied().collect::<Vec<_>>(), vec![0, 1, 4]);
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, transform: F) -> PersistentTreeSet<U>
    where
        U: Clone + Ord,
        F: FnMut(&T) -> U,
    {
        self.map_with(transform, OrdComparator)
    }

    /// Applies `transform` to every element and collects the results into a
    /// set ordered by `comparator`.
    #[must_use]
    pub fn map_with<U, D, F>(&self, transform: F, comparator: D) -> PersistentTreeSet<U, D>
    where
        U: Clone,
        D: Comparator<U> + Clone,
        F: FnMut(&T) -> U,
    {
        PersistentTreeSet::from_iter_with(self.iter().map(transform), comparator)
    }

    /// Applies `filter_transform` to every element and collects the `Some`
    /// results into a set ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=6).collect();
    /// let halves = set.filter_map(|element| (element % 2 == 0).then(|| element / 2));
    /// assert_eq!(halves.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn filter_map<U, F>(&self, filter_transform: F) -> PersistentTreeSet<U>
    where
        U: Clone + Ord,
        F: FnMut(&T) -> Option<U>,
    {
        self.filter_map_with(filter_transform, OrdComparator)
    }

    /// Applies `filter_transform` to every element and collects the `Some`
    /// results into a set ordered by `comparator`.
    #[must_use]
    pub fn filter_map_with<U, D, F>(
        &self,
        filter_transform: F,
        comparator: D,
    ) -> PersistentTreeSet<U, D>
    where
        U: Clone,
        D: Comparator<U> + Clone,
        F: FnMut(&T) -> Option<U>,
    {
        PersistentTreeSet::from_iter_with(self.iter().filter_map(filter_transform), comparator)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over elements of a [`PersistentTreeSet`].
pub struct PersistentTreeSetIterator<'a, T> {
    inner: PersistentTreeMapIterator<'a, T, ()>,
}

impl<T> Clone for PersistentTreeSetIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for PersistentTreeSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentTreeSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for PersistentTreeSetIterator<'_, T> {}

/// A range iterator over elements of a [`PersistentTreeSet`].
pub struct PersistentTreeSetRangeIterator<'a, T, C = OrdComparator> {
    inner: PersistentTreeMapRangeIterator<'a, T, (), C>,
}

impl<'a, T, C: Comparator<T>> Iterator for PersistentTreeSetRangeIterator<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }
}

impl<T, C: Comparator<T>> FusedIterator for PersistentTreeSetRangeIterator<'_, T, C> {}

/// An owning iterator over elements of a [`PersistentTreeSet`].
pub struct PersistentTreeSetIntoIterator<T> {
    inner: PersistentTreeMapIntoIterator<T, ()>,
}

impl<T: Clone> Iterator for PersistentTreeSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for PersistentTreeSetIntoIterator<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T: Clone> FusedIterator for PersistentTreeSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C: Default> Default for PersistentTreeSet<T, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> FromIterator<T> for PersistentTreeSet<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(iter, C::default())
    }
}

impl<T: Clone, C> IntoIterator for PersistentTreeSet<T, C> {
    type Item = T;
    type IntoIter = PersistentTreeSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentTreeSetIntoIterator {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a PersistentTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = PersistentTreeSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Comparator<T>> PartialEq for PersistentTreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T, C: Comparator<T>> Eq for PersistentTreeSet<T, C> {}

/// Hashes the length and then each element in order. Only sets ordered by
/// [`Ord`] are hashable, matching [`PersistentTreeMap`]'s `Hash`.
impl<T: Ord + Hash> Hash for PersistentTreeSet<T, OrdComparator> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PersistentTreeSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for PersistentTreeSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C> serde::Serialize for PersistentTreeSet<T, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentTreeSetVisitor<T, C> {
    marker: std::marker::PhantomData<fn() -> PersistentTreeSet<T, C>>,
}

#[cfg(feature = "serde")]
impl<T, C> PersistentTreeSetVisitor<T, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::de::Visitor<'de> for PersistentTreeSetVisitor<T, C>
where
    T: serde::Deserialize<'de> + Clone,
    C: Comparator<T> + Clone + Default,
{
    type Value = PersistentTreeSet<T, C>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(PersistentTreeSet::from_iter_with(elements, C::default()))
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for PersistentTreeSet<T, C>
where
    T: serde::Deserialize<'de> + Clone,
    C: Comparator<T> + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentTreeSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::FnComparator;
    use rstest::rstest;

    fn set_of(elements: &[i32]) -> PersistentTreeSet<i32> {
        elements.iter().copied().collect()
    }

    fn elements_of(set: &PersistentTreeSet<i32>) -> Vec<i32> {
        set.iter().copied().collect()
    }

    #[rstest]
    fn test_display_treeset_sorted() {
        assert_eq!(format!("{}", set_of(&[3, 1, 2])), "{1, 2, 3}");
        assert_eq!(format!("{}", PersistentTreeSet::<i32>::new()), "{}");
    }

    #[rstest]
    fn test_insert_existing_element_shares_set() {
        let set = set_of(&[1, 2, 3]);
        let same = set.insert(2);
        assert_eq!(same.len(), 3);
        assert_eq!(same, set);
    }

    #[rstest]
    fn test_remove_reports_presence() {
        let set = set_of(&[1, 2, 3]);
        let (smaller, removed) = set.remove(&2);
        assert!(removed);
        assert_eq!(elements_of(&smaller), vec![1, 3]);
        let (same, removed) = smaller.remove(&2);
        assert!(!removed);
        assert_eq!(same.len(), 2);
    }

    #[rstest]
    #[case::overlapping(&[0, 1, 2], &[1, 2, 3], &[0, 1, 2, 3], &[1, 2], &[0])]
    #[case::disjoint(&[0, 2], &[1, 3], &[0, 1, 2, 3], &[], &[0, 2])]
    #[case::left_empty(&[], &[1], &[1], &[], &[])]
    #[case::equal(&[5, 6], &[5, 6], &[5, 6], &[5, 6], &[])]
    fn test_set_algebra(
        #[case] left: &[i32],
        #[case] right: &[i32],
        #[case] union: &[i32],
        #[case] intersection: &[i32],
        #[case] difference: &[i32],
    ) {
        let left = set_of(left);
        let right = set_of(right);
        assert_eq!(elements_of(&left.union(&right)), union);
        assert_eq!(elements_of(&left.intersection(&right)), intersection);
        assert_eq!(elements_of(&left.difference(&right)), difference);
        assert_eq!(left.union(&right).len(), union.len());
        assert_eq!(left.intersection(&right).len(), intersection.len());
        assert_eq!(left.difference(&right).len(), difference.len());
    }

    #[rstest]
    fn test_subset_superset_disjoint() {
        let small = set_of(&[1, 2]);
        let large = set_of(&[0, 1, 2, 3]);
        let other = set_of(&[7, 8]);
        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert!(large.is_superset(&small));
        assert!(small.is_disjoint(&other));
        assert!(!small.is_disjoint(&large));
        assert!(PersistentTreeSet::new().is_subset(&small));
    }

    #[rstest]
    fn test_equals_matches_partial_eq() {
        let first = set_of(&[3, 2, 1]);
        let second = set_of(&[1, 2, 3]);
        assert!(first.equals(&second));
        assert_eq!(first, second);
        assert!(!first.equals(&second.insert(4)));
    }

    #[rstest]
    fn test_split_reports_presence() {
        let set = set_of(&[1, 3, 5, 7]);
        let (less, found, greater) = set.split(&5);
        assert!(found);
        assert_eq!(elements_of(&less), vec![1, 3]);
        assert_eq!(elements_of(&greater), vec![7]);
        let (_, found, _) = set.split(&4);
        assert!(!found);
    }

    #[rstest]
    fn test_filter_and_map() {
        let set: PersistentTreeSet<i32> = (0..10).collect();
        let even = set.filter(|element| element % 2 == 0);
        assert_eq!(elements_of(&even), vec![0, 2, 4, 6, 8]);
        assert_eq!(even.check_invariants(), Ok(()));
        let halves = even.map(|element| element / 4);
        assert_eq!(elements_of(&halves), vec![0, 1, 2]);
    }

    #[rstest]
    fn test_map_with_custom_comparator() {
        let set = set_of(&[1, 2, 3]);
        let descending = FnComparator::new(|left: &i32, right: &i32| right.cmp(left));
        let mapped = set.map_with(|element| element * 10, descending);
        let elements: Vec<i32> = mapped.iter().copied().collect();
        assert_eq!(elements, vec![30, 20, 10]);
    }

    #[rstest]
    fn test_filter_map_drops_and_merges() {
        let set = set_of(&[-3, -2, -1, 0, 1, 2, 3]);
        let magnitudes = set.filter_map(|element| (*element != 0).then(|| element.abs()));
        assert_eq!(elements_of(&magnitudes), vec![1, 2, 3]);
        assert_eq!(magnitudes.check_invariants(), Ok(()));

        let descending = FnComparator::new(|left: &i32, right: &i32| right.cmp(left));
        let odd = set.filter_map_with(|element| (element % 2 != 0).then_some(*element), descending);
        assert_eq!(odd.iter().copied().collect::<Vec<_>>(), vec![3, 1, -1, -3]);
    }

    #[rstest]
    fn test_folds() {
        let set = set_of(&[1, 2, 3]);
        let forward = set.fold_left(String::new(), |text, element| format!("{text}{element}"));
        let backward = set.fold_right(String::new(), |element, text| format!("{text}{element}"));
        assert_eq!(forward, "123");
        assert_eq!(backward, "321");
        assert!(set.all(|element| *element > 0));
        assert!(set.any(|element| *element == 2));
    }
}
