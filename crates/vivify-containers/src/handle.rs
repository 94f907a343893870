//! Handle - shared, interior-mutable slot values
//!
//! A [`Handle<T>`] is what a container slot actually stores. Cloning a handle
//! never copies the value: both clones point at the same object, and a
//! mutation through either is visible through the other. Use
//! [`Handle::detach`] for an independent copy.

use crate::error::{ContainerError, Result};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Reference-counted, interior-mutable value cell
///
/// # Example
/// ```
/// use vivify_containers::Handle;
///
/// let a = Handle::new(vec![1]);
/// let b = a.clone();
/// b.borrow_mut().push(2);
///
/// assert_eq!(*a.borrow(), vec![1, 2]);
/// assert!(a.ptr_eq(&b));
/// ```
pub struct Handle<T>(Rc<RefCell<T>>);

impl<T> Handle<T> {
    /// Wrap a value in a fresh handle
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Immutable borrow of the value
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed through any alias.
    #[inline]
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutable borrow of the value
    ///
    /// # Panics
    /// Panics if the value is currently borrowed through any alias.
    #[inline]
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Run `f` with mutable access to the value
    ///
    /// # Panics
    /// Panics on a borrow conflict; see [`Handle::try_with_mut`].
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Run `f` with mutable access, reporting a borrow conflict instead of panicking
    ///
    /// # Errors
    /// Returns [`ContainerError::BorrowConflict`] if another alias holds a borrow
    pub fn try_with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut guard = self
            .0
            .try_borrow_mut()
            .map_err(|_| ContainerError::BorrowConflict)?;
        Ok(f(&mut guard))
    }

    /// Replace the value, returning the old one. Visible through every alias.
    #[inline]
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    /// Whether both handles point at the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this object
    #[inline]
    #[must_use]
    pub fn alias_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Cloned copy of the value
    #[inline]
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }

    /// Independent handle holding a copy of the value
    #[inline]
    #[must_use]
    pub fn detach(&self) -> Self
    where
        T: Clone,
    {
        Self::new(self.get())
    }
}

impl<T> Clone for Handle<T> {
    /// Aliases the same object
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> From<T> for Handle<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Value equality, not identity. Use [`Handle::ptr_eq`] for identity.
impl<T: PartialEq> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl<T: Eq> Eq for Handle<T> {}

impl<T: Debug> Debug for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => value.fmt(f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }
}
