//! Sequence - ordered, index-addressable slots
//!
//! Provides [`Sequence<T>`], a growable list of [`Slot`]s. Each slot is either
//! absent (`None`) or holds a [`Handle<T>`]. Two slots may hold the same
//! handle, in which case they alias one object.
//!
//! # Index rules
//! - Negative indices count from the end (`-1` is the last slot)
//! - Reads out of range return `None`, never an error
//! - Writes past the end pad the gap with absent slots
//! - Writes before the start fail with [`ContainerError::IndexOutOfRange`],
//!   as do writes that would pad past what a `Vec` can hold

use crate::error::{ContainerError, Result};
use crate::handle::Handle;
use std::cmp::Ordering;
use std::mem;
use std::ops::{Bound, RangeBounds};

/// One addressable position: absent, or a handle to a value
pub type Slot<T> = Option<Handle<T>>;

/// Ordered list of slots
///
/// Cloning a sequence is shallow: the new sequence holds the same handles.
#[derive(Debug, PartialEq)]
pub struct Sequence<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Sequence<T> {
    /// Create empty sequence
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Sequence with one independent handle per value
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        values.into_iter().collect()
    }

    /// Sequence over pre-built slots
    #[inline]
    #[must_use]
    pub fn from_slots(slots: Vec<Slot<T>>) -> Self {
        Self { slots }
    }

    /// Number of slots, absent ones included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if there are no slots
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Handle at `index`, or `None` if the slot is absent or out of range
    #[must_use]
    pub fn get(&self, index: isize) -> Option<Handle<T>> {
        let index = resolve_index(index, self.len())?;
        self.slots[index].clone()
    }

    /// Cloned value at `index`
    #[must_use]
    pub fn value_at(&self, index: isize) -> Option<T>
    where
        T: Clone,
    {
        self.get(index).map(|handle| handle.get())
    }

    /// Whether two slots hold the very same object
    #[must_use]
    pub fn aliased(&self, a: isize, b: isize) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.ptr_eq(&b),
            _ => false,
        }
    }

    /// Up to `length` slots starting at `start`
    ///
    /// Returns the truncated remainder when the run passes the end, an empty
    /// sequence when `start` equals the length, and `None` when `start` lies
    /// outside the sequence or `length` is negative. The result shares
    /// handles with `self`.
    #[must_use]
    pub fn slice(&self, start: isize, length: isize) -> Option<Self> {
        let (start, end) = self.run_bounds(start, length)?;
        Some(Self::from_slots(self.slots[start..end].to_vec()))
    }

    /// Slots covered by `range`, with the end clamped to the length
    ///
    /// Both bounds may be negative. Returns `None` when the start lies
    /// outside the sequence.
    #[must_use]
    pub fn slice_range(&self, range: impl RangeBounds<isize>) -> Option<Self> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let start = resolve_start(start, len)?;

        let end = match range.end_bound() {
            Bound::Included(&e) => resolve_end(e, len).map(|e| e.saturating_add(1)),
            Bound::Excluded(&e) => resolve_end(e, len),
            Bound::Unbounded => Some(len),
        };
        let end = end.unwrap_or(0).clamp(start, len);

        Some(Self::from_slots(self.slots[start..end].to_vec()))
    }

    /// Store `value` in a fresh handle at `index`
    ///
    /// # Errors
    /// Returns [`ContainerError::IndexOutOfRange`] for a negative index before
    /// the start, or an index too large to pad to
    pub fn set(&mut self, index: isize, value: T) -> Result<()> {
        self.set_handle(index, Handle::new(value))
    }

    /// Store an existing handle at `index`, aliasing it
    ///
    /// # Errors
    /// Returns [`ContainerError::IndexOutOfRange`] for a negative index before
    /// the start, or an index too large to pad to
    pub fn set_handle(&mut self, index: isize, handle: Handle<T>) -> Result<()> {
        let position = resolve_write(index, self.len())?;
        self.pad_to(position.saturating_add(1), index)?;
        self.slots[position] = Some(handle);
        Ok(())
    }

    /// Replace `length` slots at `start` with `values`
    ///
    /// The replacement may be longer or shorter than the replaced run.
    ///
    /// # Errors
    /// - [`ContainerError::IndexOutOfRange`] for a negative start before the
    ///   first slot, or a start too large to pad to
    /// - [`ContainerError::InvalidSize`] for a negative length
    pub fn splice(
        &mut self,
        start: isize,
        length: isize,
        values: impl IntoIterator<Item = T>,
    ) -> Result<()> {
        let requested = start;
        let start = resolve_write(start, self.len())?;
        let length = usize::try_from(length).map_err(|_| ContainerError::InvalidSize {
            size: length as i64,
            reason: "slice length must not be negative".to_string(),
        })?;
        self.pad_to(start, requested)?;

        let end = start.saturating_add(length).min(self.len());
        tracing::trace!(start, end, "splicing sequence");
        self.slots
            .splice(start..end, values.into_iter().map(|v| Some(Handle::new(v))));
        Ok(())
    }

    /// Append a value
    #[inline]
    pub fn push(&mut self, value: T) {
        self.slots.push(Some(Handle::new(value)));
    }

    /// Append an existing handle, aliasing it
    #[inline]
    pub fn push_handle(&mut self, handle: Handle<T>) {
        self.slots.push(Some(handle));
    }

    /// Prepend a value
    #[inline]
    pub fn unshift(&mut self, value: T) {
        self.slots.insert(0, Some(Handle::new(value)));
    }

    /// Insert `values` before `index`
    ///
    /// A negative index inserts after the slot it names, so `-1` appends.
    /// An index past the end pads with absent slots first.
    ///
    /// # Errors
    /// Returns [`ContainerError::IndexOutOfRange`] for a negative index before
    /// the start, or an index too large to pad to
    pub fn insert(&mut self, index: isize, values: impl IntoIterator<Item = T>) -> Result<()> {
        let len = self.len();
        let position = if index < 0 {
            (len + 1)
                .checked_sub(index.unsigned_abs())
                .ok_or(ContainerError::IndexOutOfRange { index, len })?
        } else {
            index.unsigned_abs()
        };
        self.pad_to(position, index)?;
        self.slots.splice(
            position..position,
            values.into_iter().map(|v| Some(Handle::new(v))),
        );
        Ok(())
    }

    /// Remove and return the last slot's handle
    #[inline]
    pub fn pop(&mut self) -> Option<Handle<T>> {
        self.slots.pop().flatten()
    }

    /// Remove and return the first slot's handle
    pub fn shift(&mut self) -> Option<Handle<T>> {
        if self.slots.is_empty() {
            None
        } else {
            self.slots.remove(0)
        }
    }

    /// Remove every slot equal to `value`; returns the last removed handle
    pub fn delete(&mut self, value: &T) -> Option<Handle<T>>
    where
        T: PartialEq,
    {
        let mut removed = None;
        self.slots.retain(|slot| match slot {
            Some(handle) if *handle.borrow() == *value => {
                removed = Some(handle.clone());
                false
            }
            _ => true,
        });
        removed
    }

    /// Remove the slot at `index`; `None` when out of range or absent
    pub fn delete_at(&mut self, index: isize) -> Option<Handle<T>> {
        let index = resolve_index(index, self.len())?;
        self.slots.remove(index)
    }

    /// Remove and return the run that [`Sequence::slice`] would return
    pub fn slice_remove(&mut self, start: isize, length: isize) -> Option<Self> {
        let (start, end) = self.run_bounds(start, length)?;
        Some(Self::from_slots(self.slots.drain(start..end).collect()))
    }

    /// Slots whose value satisfies `predicate`, sharing handles with `self`
    ///
    /// Absent slots are never selected.
    #[must_use]
    pub fn select(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        self.slots
            .iter()
            .filter(|slot| slot_matches(slot, &mut predicate))
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Keep only slots whose value satisfies `predicate`
    ///
    /// Returns `None` when nothing was removed, `Some(self)` otherwise.
    pub fn select_in_place(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Option<&mut Self> {
        let before = self.len();
        self.slots.retain(|slot| slot_matches(slot, &mut predicate));
        (self.len() != before).then_some(self)
    }

    /// Sorted shallow copy; absent slots sort first
    #[must_use]
    pub fn sorted(&self) -> Self
    where
        T: Ord,
    {
        let mut copy = self.clone();
        copy.sort_in_place();
        copy
    }

    /// Sort in place; absent slots sort first
    pub fn sort_in_place(&mut self)
    where
        T: Ord,
    {
        self.slots.sort_by(compare_slots);
    }

    /// Shallow copy sorted by a key derived from each value
    #[must_use]
    pub fn sorted_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K) -> Self {
        let mut slots = self.slots.clone();
        slots.sort_by_cached_key(|slot| slot.as_ref().map(|h| key(&*h.borrow())));
        Self::from_slots(slots)
    }

    /// Whether any slot holds a value equal to `value`
    #[must_use]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.slots
            .iter()
            .flatten()
            .any(|handle| *handle.borrow() == *value)
    }

    /// Iterate over slots
    pub fn iter(&self) -> impl Iterator<Item = Option<&Handle<T>>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Cloned values, `None` for absent slots
    #[must_use]
    pub fn values(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(Handle::get))
            .collect()
    }

    /// Resolve a `(start, length)` run to slot bounds
    fn run_bounds(&self, start: isize, length: isize) -> Option<(usize, usize)> {
        let len = self.len();
        let start = resolve_start(start, len)?;
        let length = usize::try_from(length).ok()?;
        Some((start, start.saturating_add(length).min(len)))
    }

    /// Grow to `len` with absent slots; `index` is the write that asked for it
    fn pad_to(&mut self, len: usize, index: isize) -> Result<()> {
        let current = self.slots.len();
        if len <= current {
            return Ok(());
        }

        let too_big = ContainerError::IndexOutOfRange { index, len: current };
        if len > max_slots::<T>() {
            return Err(too_big);
        }
        self.slots.try_reserve_exact(len - current).map_err(|err| {
            tracing::debug!(index, len, error = %err, "cannot pad sequence");
            too_big
        })?;
        self.slots.resize_with(len, || None);
        Ok(())
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self::from_slots(self.slots.clone())
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().map(|v| Some(Handle::new(v))).collect())
    }
}

impl<T> From<Vec<Slot<T>>> for Sequence<T> {
    fn from(slots: Vec<Slot<T>>) -> Self {
        Self::from_slots(slots)
    }
}

/// Most slots a `Vec<Slot<T>>` can address
fn max_slots<T>() -> usize {
    isize::MAX.unsigned_abs() / mem::size_of::<Slot<T>>().max(1)
}

/// Resolve a read index; `None` when out of range
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        let index = index.unsigned_abs();
        (index < len).then_some(index)
    }
}

/// Resolve a run start; `len` itself is a valid start
fn resolve_start(start: isize, len: usize) -> Option<usize> {
    if start < 0 {
        len.checked_sub(start.unsigned_abs())
    } else {
        let start = start.unsigned_abs();
        (start <= len).then_some(start)
    }
}

/// Resolve a range end; negative ends before the start resolve to `None`
fn resolve_end(end: isize, len: usize) -> Option<usize> {
    if end < 0 {
        len.checked_sub(end.unsigned_abs())
    } else {
        Some(end.unsigned_abs())
    }
}

/// Resolve a write index; positive indices may lie past the end
fn resolve_write(index: isize, len: usize) -> Result<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
            .ok_or(ContainerError::IndexOutOfRange { index, len })
    } else {
        Ok(index.unsigned_abs())
    }
}

fn slot_matches<T>(slot: &Slot<T>, predicate: &mut impl FnMut(&T) -> bool) -> bool {
    slot.as_ref().is_some_and(|handle| predicate(&*handle.borrow()))
}

fn compare_slots<T: Ord>(a: &Slot<T>, b: &Slot<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => (*a.borrow()).cmp(&*b.borrow()),
    }
}
