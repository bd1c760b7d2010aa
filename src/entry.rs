//! The key/value pair every backing stores and exports

use std::{
    fmt,
    hash::{Hash, Hasher},
    mem,
};

/// A key/value pair.
///
/// The key is fixed at creation; only the value can change. Two entries are equal when their
/// keys are equal, whatever their values.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// The key, never mutated after creation
    key: K,
    /// The value currently mapped to `key`
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates a new entry
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the value
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the value, returning the old one
    pub fn set_value(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its key and value
    #[must_use]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

impl<K: Hash, V> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} -> {}>", self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
