//! The map contract shared by every backing, and the runtime choice between backings

use std::{fmt, hash::Hash, str::FromStr};

use crate::{
    ChainedHashMap, Entry, LinearMap, TreeMap,
    config::HashMapConfig,
    error::{Error, Result},
};

/// Operations every backing strategy provides.
///
/// Callers that hold a `Box<dyn Map<K, V>>` can swap the backing without touching call sites.
/// A missing key is never an error: lookups return `None` or `false`, and removing from an
/// empty map behaves exactly like removing a key that is not there.
///
/// `keys`, `values` and `entries` agree with each other: without a mutation in between, the
/// i-th key, the i-th value and the i-th entry describe the same mapping. The tree exports in
/// ascending key order; the other backings use their own storage order.
pub trait Map<K, V> {
    /// Maps `key` to `value`, returning the value it replaced
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value mapped to `key`
    fn get(&self, key: &K) -> Option<&V>;

    /// Returns true if `key` is mapped
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning the value it was mapped to
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Number of mappings
    fn len(&self) -> usize;

    /// Returns true if there are no mappings
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every mapping
    fn clear(&mut self);

    /// All keys, in export order
    fn keys(&self) -> Vec<K>;

    /// All values, in export order
    fn values(&self) -> Vec<V>;

    /// All mappings, in export order
    fn entries(&self) -> Vec<Entry<K, V>>;

    /// Worst-case number of steps needed to reach any key.
    ///
    /// Tree height, longest bucket chain, or the full length of a linear list.
    fn max_probe_depth(&self) -> usize;
}

impl<K, V, M> Map<K, V> for Box<M>
where
    M: Map<K, V> + ?Sized,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        (**self).put(key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        (**self).get(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        (**self).contains_key(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        (**self).remove(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn keys(&self) -> Vec<K> {
        (**self).keys()
    }

    fn values(&self) -> Vec<V> {
        (**self).values()
    }

    fn entries(&self) -> Vec<Entry<K, V>> {
        (**self).entries()
    }

    fn max_probe_depth(&self) -> usize {
        (**self).max_probe_depth()
    }
}

/// The available backing strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    /// Unsorted list, linear scans
    Linear,
    /// Unbalanced binary search tree
    Tree,
    /// Chained hash table with load-factor resizing
    Hash,
}

impl Backing {
    /// Every backing, in a fixed order
    pub const ALL: [Self; 3] = [Self::Linear, Self::Tree, Self::Hash];

    /// Creates an empty map with this backing and default settings
    #[must_use]
    pub fn build<K, V>(self) -> Box<dyn Map<K, V>>
    where
        K: Ord + Hash + Clone + 'static,
        V: Clone + 'static,
    {
        match self {
            Self::Linear => Box::new(LinearMap::new()),
            Self::Tree => Box::new(TreeMap::new()),
            Self::Hash => Box::new(ChainedHashMap::new()),
        }
    }

    /// Creates an empty map with this backing; `config` sizes the hash backing.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `config` when it is unusable, whatever the backing.
    pub fn build_with_config<K, V>(self, config: HashMapConfig) -> Result<Box<dyn Map<K, V>>>
    where
        K: Ord + Hash + Clone + 'static,
        V: Clone + 'static,
    {
        config.validate()?;
        match self {
            Self::Hash => Ok(Box::new(ChainedHashMap::with_config(config)?)),
            other => Ok(other.build()),
        }
    }

    /// Short lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Tree => "tree",
            Self::Hash => "hash",
        }
    }
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "list" | "arraylist" => Ok(Self::Linear),
            "tree" | "bst" => Ok(Self::Tree),
            "hash" | "hashmap" => Ok(Self::Hash),
            _ => Err(Error::UnknownBacking(s.to_owned())),
        }
    }
}
