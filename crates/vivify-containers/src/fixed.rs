//! FixedSizeContainer - sized construction with explicit default modes
//!
//! Three ways to fill `size` slots, each a separate operation so the choice
//! between aliasing and independence is always visible at the call site:
//!
//! - [`FixedSizeContainer::create`]: every slot absent
//! - [`FixedSizeContainer::create_with_shared_default`]: every slot holds the
//!   same handle; a mutation through one slot shows through all of them
//! - [`FixedSizeContainer::create_with_factory`]: the factory runs once per
//!   slot; slots never alias
//!
//! # Example
//! ```
//! use vivify_containers::FixedSizeContainer;
//!
//! let containers = FixedSizeContainer::default();
//!
//! let shared = containers.create_with_shared_default(5, Vec::<i32>::new()).unwrap();
//! shared.get(-1).unwrap().borrow_mut().push(1);
//! assert_eq!(shared.value_at(0), Some(vec![1]));
//!
//! let owned = containers.create_with_factory(5, Vec::<i32>::new).unwrap();
//! owned.get(-1).unwrap().borrow_mut().push(1);
//! assert_eq!(owned.value_at(0), Some(vec![]));
//! ```

use crate::config::ContainerConfig;
use crate::error::{ContainerError, Result};
use crate::handle::Handle;
use crate::mapping::Mapping;
use crate::sequence::{Sequence, Slot};
use std::hash::Hash;

/// Sized container construction, bounded by [`ContainerConfig`]
#[derive(Debug, Clone, Default)]
pub struct FixedSizeContainer {
    config: ContainerConfig,
}

impl FixedSizeContainer {
    /// Create with configuration
    #[inline]
    #[must_use]
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// `size` absent slots
    ///
    /// # Errors
    /// Returns [`ContainerError::InvalidSize`] if `size` is negative or above `max_slots`,
    /// or cannot be allocated
    pub fn create<T>(&self, size: isize) -> Result<Sequence<T>> {
        let mut slots = self.allocate(size)?;
        tracing::debug!(size, mode = "absent", "creating sequence");

        slots.resize_with(size.unsigned_abs(), || None);
        Ok(Sequence::from_slots(slots))
    }

    /// `size` slots that all hold one handle wrapping `default`
    ///
    /// # Errors
    /// Returns [`ContainerError::InvalidSize`] if `size` is negative or above `max_slots`,
    /// or cannot be allocated
    pub fn create_with_shared_default<T>(&self, size: isize, default: T) -> Result<Sequence<T>> {
        self.create_with_shared_handle(size, Handle::new(default))
    }

    /// `size` slots that all alias `handle`; the caller may keep its own alias
    ///
    /// # Errors
    /// Returns [`ContainerError::InvalidSize`] if `size` is negative or above `max_slots`,
    /// or cannot be allocated
    pub fn create_with_shared_handle<T>(&self, size: isize, handle: Handle<T>) -> Result<Sequence<T>> {
        let mut slots = self.allocate(size)?;
        tracing::debug!(size, mode = "shared", "creating sequence");

        slots.resize(size.unsigned_abs(), Some(handle));
        Ok(Sequence::from_slots(slots))
    }

    /// `size` slots, each filled by its own call to `factory`
    ///
    /// # Errors
    /// Returns [`ContainerError::InvalidSize`] if `size` is negative or above `max_slots`,
    /// or cannot be allocated
    pub fn create_with_factory<T>(
        &self,
        size: isize,
        mut factory: impl FnMut() -> T,
    ) -> Result<Sequence<T>> {
        let mut slots = self.allocate(size)?;
        tracing::debug!(size, mode = "factory", "creating sequence");

        slots.extend((0..size).map(|_| Some(Handle::new(factory()))));
        Ok(Sequence::from_slots(slots))
    }

    /// Handle at `index`; see [`Sequence::get`]
    ///
    /// Reads do not depend on the configuration.
    #[inline]
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn get<T>(&self, sequence: &Sequence<T>, index: isize) -> Option<Handle<T>> {
        sequence.get(index)
    }

    /// Run of up to `length` slots; see [`Sequence::slice`]
    ///
    /// Reads do not depend on the configuration.
    #[inline]
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn slice<T>(&self, sequence: &Sequence<T>, start: isize, length: isize) -> Option<Sequence<T>> {
        sequence.slice(start, length)
    }

    /// Empty mapping whose missing keys are resolved by `factory`
    ///
    /// The factory receives the mapping itself and may insert the value it
    /// computes. One that does not insert leaves the mapping unchanged.
    #[must_use]
    pub fn mapping_with_lazy_default<K, V>(
        &self,
        factory: impl Fn(&mut Mapping<K, V>, &K) -> Handle<V> + 'static,
    ) -> Mapping<K, V>
    where
        K: Hash + Eq,
    {
        tracing::debug!(mode = "lazy", "creating mapping");
        Mapping::with_lazy_default(factory)
    }

    /// Empty slot vector with room for `size` slots
    fn allocate<T>(&self, size: isize) -> Result<Vec<Slot<T>>> {
        let requested = size as i64;
        let size = usize::try_from(size).map_err(|_| ContainerError::negative_size(requested))?;
        if size > self.config.max_slots {
            return Err(ContainerError::size_limit(requested, self.config.max_slots));
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(size)
            .map_err(|err| ContainerError::unallocatable(requested, &err))?;
        Ok(slots)
    }
}
