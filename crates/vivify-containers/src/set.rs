//! OrderedSet - insertion-ordered set with set algebra
//!
//! Membership, insertion and removal are O(1). Iteration follows insertion
//! order, and every operator keeps the left operand's order first.

use crate::sequence::Sequence;
use indexmap::IndexSet;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Sub};

/// Insertion-ordered set of owned values
///
/// # Example
/// ```
/// use vivify_containers::OrderedSet;
///
/// let a: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
/// let b: OrderedSet<i32> = [3, 5, 6].into_iter().collect();
///
/// assert_eq!((&a | &b).to_vec(), vec![1, 2, 3, 5, 6]);
/// assert_eq!((&a & &b).to_vec(), vec![3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T: Hash + Eq> {
    inner: IndexSet<T>,
}

impl<T: Hash + Eq> OrderedSet<T> {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: IndexSet::new(),
        }
    }

    /// Distinct values of a sequence; absent slots are skipped
    #[must_use]
    pub fn from_sequence(sequence: &Sequence<T>) -> Self
    where
        T: Clone,
    {
        sequence.values().into_iter().flatten().collect()
    }

    /// Add `value`; returns `false` if it was already present
    #[inline]
    pub fn add(&mut self, value: T) -> bool {
        self.inner.insert(value)
    }

    /// Whether `value` is a member
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }

    /// Remove `value`; removing a non-member is a no-op returning `false`
    #[inline]
    pub fn delete(&mut self, value: &T) -> bool {
        self.inner.shift_remove(value)
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the set has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.iter()
    }

    /// Members copied into a vector
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.iter().cloned().collect()
    }

    /// Members copied into a sequence of independent slots
    #[must_use]
    pub fn to_sequence(&self) -> Sequence<T>
    where
        T: Clone,
    {
        self.inner.iter().cloned().collect()
    }
}

impl<T: Hash + Eq> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T: Hash + Eq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

/// Union
impl<T: Hash + Eq + Clone> BitOr for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    fn bitor(self, rhs: Self) -> OrderedSet<T> {
        OrderedSet {
            inner: &self.inner | &rhs.inner,
        }
    }
}

/// Intersection
impl<T: Hash + Eq + Clone> BitAnd for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    fn bitand(self, rhs: Self) -> OrderedSet<T> {
        OrderedSet {
            inner: &self.inner & &rhs.inner,
        }
    }
}

/// Difference
impl<T: Hash + Eq + Clone> Sub for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    fn sub(self, rhs: Self) -> OrderedSet<T> {
        OrderedSet {
            inner: &self.inner - &rhs.inner,
        }
    }
}

/// Symmetric difference
impl<T: Hash + Eq + Clone> BitXor for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    fn bitxor(self, rhs: Self) -> OrderedSet<T> {
        OrderedSet {
            inner: &self.inner ^ &rhs.inner,
        }
    }
}
