use std::borrow::Borrow;

use crate::{Entry, Map};

/// A map kept as a plain list of entries.
///
/// Every operation scans the list front to back. Entries stay in insertion order, including
/// across removals, which makes this the reference the other backings are checked against.
#[derive(Debug, Clone)]
pub struct LinearMap<K, V> {
    /// The entries, in insertion order
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for LinearMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Eq, V> Extend<(K, V)> for LinearMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Eq, V> FromIterator<(K, V)> for LinearMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> LinearMap<K, V> {
    /// Creates an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|entry| (entry.key(), entry.value()))
    }
}

impl<K: Eq, V> LinearMap<K, V> {
    /// Position of the entry holding `key`
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter()
            .position(|entry| entry.key().borrow() == key)
    }

    /// Maps `key` to `value`, returning the replaced value
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(entry) = self.entries.iter_mut().find(|entry| *entry.key() == key) {
            return Some(entry.set_value(value));
        }
        self.entries.push(Entry::new(key, value));
        None
    }

    /// Returns the value mapped to `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter()
            .find(|entry| entry.key().borrow() == key)
            .map(Entry::value)
    }

    /// Returns a mutable reference to the value mapped to `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter_mut()
            .find(|entry| entry.key().borrow() == key)
            .map(Entry::value_mut)
    }

    /// Returns true if `key` is mapped
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Removes `key`, shifting later entries down so insertion order is kept
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let index = self.position(key)?;
        let (_, value) = self.entries.remove(index).into_pair();
        Some(value)
    }
}

impl<K, V> Map<K, V> for LinearMap<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn entries(&self) -> Vec<Entry<K, V>> {
        self.entries.clone()
    }

    fn max_probe_depth(&self) -> usize {
        self.entries.len()
    }
}
