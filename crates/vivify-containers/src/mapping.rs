//! Mapping - insertion-ordered key/value store with default providers
//!
//! Provides [`Mapping<K, V>`] over an [`IndexMap`]. What a missing key
//! resolves to is decided by its [`DefaultProvider`]:
//!
//! - `None`: the lookup yields `None`
//! - `Shared`: every missing key yields the same handle; nothing is inserted,
//!   so pushing into that handle feeds one object for all keys
//! - `Lazy`: a factory is invoked with the mapping and the key, and may
//!   insert what it computes (autovivification)
//!
//! # Example
//! ```
//! use vivify_containers::Mapping;
//!
//! let mut groups: Mapping<&str, Vec<i32>> = Mapping::with_vivifying_default(Vec::new);
//! groups.get(&"a").unwrap().borrow_mut().push(1);
//! groups.get(&"b").unwrap().borrow_mut().push(2);
//!
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups.fetch(&"a").unwrap().get(), vec![1]);
//! ```

use crate::error::{ContainerError, Result};
use crate::handle::Handle;
use indexmap::IndexMap;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;
use std::rc::Rc;

/// Factory invoked for a missing key
pub type LazyDefault<K, V> = Rc<dyn Fn(&mut Mapping<K, V>, &K) -> Handle<V>>;

/// Values that may hold a mapping of their own, for [`Mapping::dig`]
pub trait Nested<K>: Sized {
    /// The nested mapping, or `None` for a leaf value
    fn as_mapping(&self) -> Option<&Mapping<K, Self>>;
}

/// How a missing key is resolved
pub enum DefaultProvider<K, V> {
    /// Missing keys are absent
    None,
    /// Missing keys all resolve to this one handle
    Shared(Handle<V>),
    /// Missing keys are computed, and possibly inserted, by a factory
    Lazy(LazyDefault<K, V>),
}

impl<K, V> Clone for DefaultProvider<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Shared(handle) => Self::Shared(handle.clone()),
            Self::Lazy(factory) => Self::Lazy(Rc::clone(factory)),
        }
    }
}

impl<K, V> Debug for DefaultProvider<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Shared(_) => f.write_str("Shared"),
            Self::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

/// Insertion-ordered mapping from keys to value handles
///
/// Cloning is shallow: the clone shares value handles and the provider.
/// Derived mappings (`select`, `merge`, `transform_*`, `slice`, `except`)
/// start without a provider.
#[derive(Debug)]
pub struct Mapping<K, V> {
    entries: IndexMap<K, Handle<V>>,
    provider: DefaultProvider<K, V>,
}

impl<K: Hash + Eq, V> Mapping<K, V> {
    /// Create empty mapping without a default
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_provider(DefaultProvider::None)
    }

    /// Empty mapping whose missing keys all resolve to one handle of `default`
    #[must_use]
    pub fn with_shared_default(default: V) -> Self {
        Self::with_provider(DefaultProvider::Shared(Handle::new(default)))
    }

    /// Empty mapping whose missing keys are resolved by `factory`
    #[must_use]
    pub fn with_lazy_default(
        factory: impl Fn(&mut Mapping<K, V>, &K) -> Handle<V> + 'static,
    ) -> Self {
        Self::with_provider(DefaultProvider::Lazy(Rc::new(factory)))
    }

    /// Empty mapping that inserts a fresh `factory()` value on first access
    #[must_use]
    pub fn with_vivifying_default(factory: impl Fn() -> V + 'static) -> Self
    where
        K: Clone + 'static,
        V: 'static,
    {
        Self::with_lazy_default(move |mapping, key| {
            let handle = Handle::new(factory());
            mapping.insert_handle(key.clone(), handle.clone());
            handle
        })
    }

    /// Empty mapping with an explicit provider
    #[inline]
    #[must_use]
    pub fn with_provider(provider: DefaultProvider<K, V>) -> Self {
        Self {
            entries: IndexMap::new(),
            provider,
        }
    }

    /// Current provider
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &DefaultProvider<K, V> {
        &self.provider
    }

    /// Value for `key`, falling back to the provider
    ///
    /// Takes `&mut self` because a lazy provider may insert.
    pub fn get(&mut self, key: &K) -> Option<Handle<V>> {
        if let Some(handle) = self.entries.get(key) {
            return Some(handle.clone());
        }

        let factory = match &self.provider {
            DefaultProvider::None => return None,
            DefaultProvider::Shared(handle) => return Some(handle.clone()),
            DefaultProvider::Lazy(factory) => Rc::clone(factory),
        };
        let len_before = self.entries.len();
        let handle = factory(self, key);
        tracing::trace!(
            inserted = self.entries.len() > len_before,
            "lazy default provider invoked"
        );
        Some(handle)
    }

    /// Stored value for `key`, ignoring the provider
    #[inline]
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<Handle<V>> {
        self.entries.get(key).cloned()
    }

    /// Stored value for `key`
    ///
    /// # Errors
    /// Returns [`ContainerError::KeyNotFound`] when the key is not stored,
    /// whatever the provider
    pub fn fetch(&self, key: &K) -> Result<Handle<V>>
    where
        K: Debug,
    {
        self.peek(key)
            .ok_or_else(|| ContainerError::key_not_found(key))
    }

    /// Stored value for `key`, or a fresh handle of `default`
    #[must_use]
    pub fn fetch_or(&self, key: &K, default: V) -> Handle<V> {
        self.peek(key).unwrap_or_else(|| Handle::new(default))
    }

    /// Value at the end of `path`, stepping through nested mappings
    ///
    /// Returns `None` when any key along the path is not stored or an
    /// intermediate value holds no mapping. Providers are not consulted.
    #[must_use]
    pub fn dig(&self, path: &[K]) -> Option<Handle<V>>
    where
        V: Nested<K>,
    {
        let (first, rest) = path.split_first()?;
        let mut current = self.peek(first)?;
        for key in rest {
            let next = current.borrow().as_mapping()?.peek(key)?;
            current = next;
        }
        Some(current)
    }

    /// Store `value` under `key`; returns the previous handle
    pub fn insert(&mut self, key: K, value: V) -> Option<Handle<V>> {
        self.insert_handle(key, Handle::new(value))
    }

    /// Store an existing handle under `key`, aliasing it
    pub fn insert_handle(&mut self, key: K, handle: Handle<V>) -> Option<Handle<V>> {
        self.entries.insert(key, handle)
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn delete(&mut self, key: &K) -> Option<Handle<V>> {
        self.entries.shift_remove(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Value handles in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Handle<V>> {
        self.entries.values()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Handle<V>)> {
        self.entries.iter()
    }

    /// Whether `key` is stored
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether any stored value equals `value`
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.values().any(|handle| *handle.borrow() == *value)
    }

    /// Number of stored entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries satisfying `predicate`, sharing value handles
    #[must_use]
    pub fn select(&self, mut predicate: impl FnMut(&K, &V) -> bool) -> Self
    where
        K: Clone,
    {
        self.derive(
            self.entries
                .iter()
                .filter(|(k, v)| predicate(*k, &*v.borrow()))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    /// Keep only entries satisfying `predicate`
    ///
    /// Returns `None` when nothing was removed, `Some(self)` otherwise.
    pub fn select_in_place(&mut self, mut predicate: impl FnMut(&K, &V) -> bool) -> Option<&mut Self> {
        let before = self.len();
        self.entries.retain(|k, v| predicate(k, &*v.borrow()));
        (self.len() != before).then_some(self)
    }

    /// Entries of `self` overwritten by those of `other`
    ///
    /// Keys already in `self` keep their position; new keys are appended.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self
    where
        K: Clone,
    {
        self.merge_with(other, |_, _, new| new.clone())
    }

    /// Like [`Mapping::merge`], with `resolve(key, old, new)` deciding conflicts
    #[must_use]
    pub fn merge_with(
        &self,
        other: &Self,
        mut resolve: impl FnMut(&K, &Handle<V>, &Handle<V>) -> Handle<V>,
    ) -> Self
    where
        K: Clone,
    {
        let mut merged = self.derive(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (key, new) in &other.entries {
            let handle = match merged.entries.get(key) {
                Some(old) => resolve(key, old, new),
                None => new.clone(),
            };
            merged.entries.insert(key.clone(), handle);
        }
        merged
    }

    /// Mapping with every key passed through `f`; on collision the later entry wins
    #[must_use]
    pub fn transform_keys<K2: Hash + Eq>(&self, mut f: impl FnMut(&K) -> K2) -> Mapping<K2, V> {
        Mapping {
            entries: self.entries.iter().map(|(k, v)| (f(k), v.clone())).collect(),
            provider: DefaultProvider::None,
        }
    }

    /// Pass every key through `f` in place
    pub fn transform_keys_in_place(&mut self, mut f: impl FnMut(&K) -> K) {
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries.into_iter().map(|(k, v)| (f(&k), v)).collect();
    }

    /// Mapping with every value passed through `f` into fresh handles
    #[must_use]
    pub fn transform_values<V2>(&self, mut f: impl FnMut(&V) -> V2) -> Mapping<K, V2>
    where
        K: Clone,
    {
        Mapping {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), Handle::new(f(&*v.borrow()))))
                .collect(),
            provider: DefaultProvider::None,
        }
    }

    /// Replace every value with `f(value)` in place
    ///
    /// Each key gets a fresh handle; objects shared with other containers
    /// are left untouched.
    pub fn transform_values_in_place(&mut self, mut f: impl FnMut(&V) -> V) {
        for handle in self.entries.values_mut() {
            let value = f(&*handle.borrow());
            *handle = Handle::new(value);
        }
    }

    /// Only the given keys, in insertion order
    #[must_use]
    pub fn slice(&self, keys: &[K]) -> Self
    where
        K: Clone,
    {
        self.derive(
            self.entries
                .iter()
                .filter(|(k, _)| keys.contains(*k))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    /// Everything except the given keys
    #[must_use]
    pub fn except(&self, keys: &[K]) -> Self
    where
        K: Clone,
    {
        self.derive(
            self.entries
                .iter()
                .filter(|(k, _)| !keys.contains(*k))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    fn derive(&self, entries: impl Iterator<Item = (K, Handle<V>)>) -> Self {
        Self {
            entries: entries.collect(),
            provider: DefaultProvider::None,
        }
    }
}

impl<K: Hash + Eq> Mapping<K, usize> {
    /// Occurrence count of every item, in first-seen order
    #[must_use]
    pub fn tally(items: impl IntoIterator<Item = K>) -> Self {
        let mut counts = Self::new();
        for item in items {
            counts
                .entries
                .entry(item)
                .or_insert_with(|| Handle::new(0))
                .with_mut(|n| *n += 1);
        }
        counts
    }
}

impl<K: Hash + Eq, T> Mapping<K, Vec<T>> {
    /// Items grouped under `key(item)`, groups in first-seen order
    #[must_use]
    pub fn group_by(items: impl IntoIterator<Item = T>, mut key: impl FnMut(&T) -> K) -> Self {
        let mut groups = Self::new();
        for item in items {
            groups
                .entries
                .entry(key(&item))
                .or_insert_with(|| Handle::new(Vec::new()))
                .with_mut(|group| group.push(item));
        }
        groups
    }
}

impl<K: Hash + Eq, V> Default for Mapping<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V> Clone for Mapping<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            provider: self.provider.clone(),
        }
    }
}

/// Compares stored entries by value; providers are ignored
impl<K: Hash + Eq, V: PartialEq> PartialEq for Mapping<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for Mapping<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k, Handle::new(v))).collect(),
            provider: DefaultProvider::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn abc() -> Mapping<&'static str, i32> {
        [("a", 1), ("b", 2), ("c", 3)].into_iter().collect()
    }

    #[derive(Debug)]
    enum Profile {
        Age(u32),
        Section(Mapping<&'static str, Profile>),
    }

    impl Nested<&'static str> for Profile {
        fn as_mapping(&self) -> Option<&Mapping<&'static str, Profile>> {
            match self {
                Self::Section(mapping) => Some(mapping),
                Self::Age(_) => None,
            }
        }
    }

    fn section(entries: impl IntoIterator<Item = (&'static str, Profile)>) -> Profile {
        Profile::Section(entries.into_iter().collect())
    }

    fn pairs(mapping: &Mapping<&'static str, i32>) -> Vec<(&'static str, i32)> {
        mapping.iter().map(|(k, v)| (*k, v.get())).collect()
    }

    #[test]
    fn missing_key_without_provider_is_absent() {
        let mut mapping = abc();
        assert!(mapping.get(&"z").is_none());
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn fetch_is_strict() {
        let mapping = abc();
        assert_eq!(mapping.fetch(&"a").unwrap().get(), 1);
        assert_eq!(
            mapping.fetch(&"z"),
            Err(ContainerError::KeyNotFound("\"z\"".to_string()))
        );
        assert_eq!(mapping.fetch_or(&"z", 0).get(), 0);
    }

    #[test]
    fn fetch_ignores_provider() {
        let mapping: Mapping<&str, i32> = Mapping::with_shared_default(0);
        assert!(mapping.fetch(&"a").is_err());
    }

    #[test]
    fn dig_follows_nested_path() {
        let user = section([("profile", section([("age", Profile::Age(20))]))]);
        let root: Mapping<&str, Profile> = [("user", user)].into_iter().collect();

        let age = root.dig(&["user", "profile", "age"]).unwrap();
        assert!(matches!(*age.borrow(), Profile::Age(20)));
        assert!(root.dig(&["user", "profile"]).is_some());
    }

    #[test]
    fn dig_missing_intermediate_is_absent() {
        let user = section([("profile", section([("age", Profile::Age(20))]))]);
        let root: Mapping<&str, Profile> = [("user", user)].into_iter().collect();

        assert!(root.dig(&["user", "community", "comment"]).is_none());
        assert!(root.dig(&["user", "profile", "age", "years"]).is_none());
        assert!(root.dig(&["guest"]).is_none());
        assert!(root.dig(&[]).is_none());
    }

    #[test]
    fn shared_default_feeds_one_object() {
        let mut mapping: Mapping<&str, Vec<i32>> = Mapping::with_shared_default(Vec::new());
        for (key, n) in [("a", 1), ("b", 2), ("1", 3)] {
            let handle = mapping.get(&key).unwrap();
            handle.borrow_mut().push(n);
            mapping.insert_handle(key, handle);
        }

        assert_eq!(mapping.len(), 3);
        for key in ["a", "b", "1"] {
            assert_eq!(mapping.fetch(&key).unwrap().get(), vec![1, 2, 3]);
        }
    }

    #[test]
    fn shared_default_read_does_not_insert() {
        let mut mapping: Mapping<&str, Vec<i32>> = Mapping::with_shared_default(Vec::new());
        mapping.get(&"a").unwrap().borrow_mut().push(1);

        assert!(mapping.is_empty());
        assert_eq!(mapping.get(&"b").unwrap().get(), vec![1]);
    }

    #[test]
    fn vivifying_default_inserts_fresh_values() {
        let mut mapping: Mapping<&str, Vec<i32>> = Mapping::with_vivifying_default(Vec::new);
        mapping.get(&"a").unwrap().borrow_mut().push(1);
        mapping.get(&"b").unwrap().borrow_mut().push(2);

        assert_eq!(mapping.fetch(&"a").unwrap().get(), vec![1]);
        assert_eq!(mapping.fetch(&"b").unwrap().get(), vec![2]);
    }

    #[test]
    fn lazy_provider_invoked_once_when_inserting() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut mapping: Mapping<String, usize> = Mapping::with_lazy_default(move |m, key: &String| {
            counter.set(counter.get() + 1);
            let handle = Handle::new(key.len());
            m.insert_handle(key.clone(), handle.clone());
            handle
        });

        let first = mapping.get(&"four".to_string()).unwrap();
        let second = mapping.get(&"four".to_string()).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(first.ptr_eq(&second));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn transform_values_pair() {
        let mut mapping = abc();
        let doubled = mapping.transform_values(|v| v * 2);
        assert_eq!(doubled.fetch(&"c").unwrap().get(), 6);
        assert_eq!(pairs(&mapping), vec![("a", 1), ("b", 2), ("c", 3)]);

        mapping.transform_values_in_place(|v| v + 10);
        assert_eq!(pairs(&mapping), vec![("a", 11), ("b", 12), ("c", 13)]);
    }

    #[test]
    fn transform_values_in_place_leaves_shared_objects() {
        let shared = Handle::new(1);
        let mut mapping: Mapping<&str, i32> = Mapping::new();
        mapping.insert_handle("a", shared.clone());

        mapping.transform_values_in_place(|v| v * 100);
        assert_eq!(shared.get(), 1);
        assert_eq!(mapping.fetch(&"a").unwrap().get(), 100);
    }

    #[test]
    fn transform_keys_pair() {
        let mut mapping: Mapping<String, i32> =
            [("user_id".to_string(), 1)].into_iter().collect();
        let lengths = mapping.transform_keys(String::len);
        assert!(lengths.contains_key(&7));

        mapping.transform_keys_in_place(|k| k.to_uppercase());
        assert!(mapping.contains_key(&"USER_ID".to_string()));
    }

    #[test]
    fn delete_keeps_order() {
        let mut mapping = abc();
        assert_eq!(mapping.delete(&"a").map(|h| h.get()), Some(1));
        assert!(mapping.delete(&"a").is_none());
        assert_eq!(mapping.keys().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn queries() {
        let mapping = abc();
        assert!(mapping.contains_key(&"a"));
        assert!(mapping.contains_value(&2));
        assert!(!mapping.contains_value(&7));
        assert_eq!(mapping.values().map(Handle::get).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
