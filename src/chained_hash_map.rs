use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, BuildHasherDefault, DefaultHasher, Hash},
    mem,
};

use crate::{Entry, Map, config::HashMapConfig, error::Result};

/// Hash builder used unless another one is supplied.
///
/// `DefaultHasher::default()` always starts from the same keys, so a given set of keys always
/// produces the same bucket layout.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// A bucket: the head of a singly linked chain
type Chain<K, V> = Option<Box<ChainNode<K, V>>>;

/// A link in a bucket chain
#[derive(Debug)]
struct ChainNode<K, V> {
    /// The key-value pair
    entry: Entry<K, V>,
    /// The rest of the chain
    next: Chain<K, V>,
}

/// A hash table resolving collisions by chaining.
///
/// Keys live in bucket `hash(key) mod capacity`, each bucket holding a linked chain. New keys
/// join the tail of their chain. The bucket array doubles once `len > capacity * max_load_factor`
/// and halves once a removal leaves `len < capacity * max_load_factor / 4`, never dropping below
/// the configured minimum. Both resizes rehash every entry into a fresh array, moving nodes
/// rather than cloning them.
///
/// Lookups cost O(1) on average and O(chain length) at worst; a hash function that sends many
/// keys to the same bucket degrades every operation on them to a linear walk.
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    /// The bucket array; its length is the capacity
    buckets: Vec<Chain<K, V>>,
    /// Current number of entries across all chains
    size: usize,
    /// Sizing policy
    config: HashMapConfig,
    /// Builds the hasher for each key
    hash_builder: S,
}

/// Allocates `capacity` empty buckets
fn empty_buckets<K, V>(capacity: usize) -> Vec<Chain<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

/// Maps a hash to a bucket index
fn bucket_for(hash: u64, capacity: usize) -> usize {
    let capacity = u64::try_from(capacity).unwrap_or(u64::MAX);
    hash.checked_rem(capacity)
        .and_then(|index| usize::try_from(index).ok())
        .unwrap_or(0)
}

/// Hangs `node` off the end of a chain
fn append<K, V>(mut link: &mut Chain<K, V>, node: Box<ChainNode<K, V>>) {
    while let Some(existing) = link {
        link = &mut existing.next;
    }
    *link = Some(node);
}

/// Drops a chain node by node, so long chains do not recurse
fn unlink_chain<K, V>(chain: &mut Chain<K, V>) {
    let mut next = chain.take();
    while let Some(mut node) = next {
        next = node.next.take();
    }
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainedHashMap<K, V> {
    /// Creates an empty map with 16 buckets and a 0.75 load factor
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty map with `capacity` buckets (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let config = HashMapConfig::new().with_initial_capacity(capacity.max(1));
        Self::from_parts(config, DefaultHashBuilder::default())
    }

    /// Creates an empty map with the given bucket count and maximum load factor.
    ///
    /// # Errors
    ///
    /// Fails when `capacity` is zero or `max_load_factor` is not finite or is below
    /// [`MIN_MAX_LOAD_FACTOR`](crate::MIN_MAX_LOAD_FACTOR).
    pub fn with_capacity_and_load_factor(capacity: usize, max_load_factor: f64) -> Result<Self> {
        Self::with_config(
            HashMapConfig::new()
                .with_initial_capacity(capacity)
                .with_max_load_factor(max_load_factor),
        )
    }

    /// Creates an empty map sized by `config`.
    ///
    /// # Errors
    ///
    /// Fails when `config` does not validate.
    pub fn with_config(config: HashMapConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Creates an empty map with default sizing that hashes keys with `hash_builder`
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::from_parts(HashMapConfig::default(), hash_builder)
    }

    /// Creates an empty map sized by `config` that hashes keys with `hash_builder`.
    ///
    /// # Errors
    ///
    /// Fails when `config` does not validate.
    pub fn with_config_and_hasher(config: HashMapConfig, hash_builder: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hash_builder))
    }

    /// Builds the map from an already valid configuration
    fn from_parts(config: HashMapConfig, hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(config.initial_capacity),
            size: 0,
            config,
            hash_builder,
        }
    }

    /// Returns the number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the load factor that triggers growth
    #[must_use]
    pub const fn max_load_factor(&self) -> f64 {
        self.config.max_load_factor
    }

    /// Returns the sizing policy
    #[must_use]
    pub const fn config(&self) -> &HashMapConfig {
        &self.config
    }

    /// Returns the current ratio of entries to buckets
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// The largest `len` allowed before the table doubles
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn growth_threshold(&self) -> f64 {
        self.buckets.len() as f64 * self.config.max_load_factor
    }

    /// Returns the length of every chain, in bucket order
    #[must_use]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|chain| {
                let mut length: usize = 0;
                let mut link = chain.as_deref();
                while let Some(node) = link {
                    length = length.saturating_add(1);
                    link = node.next.as_deref();
                }
                length
            })
            .collect()
    }

    /// Returns the length of the longest chain
    #[must_use]
    pub fn longest_chain(&self) -> usize {
        self.chain_lengths().into_iter().max().unwrap_or(0)
    }

    /// Iterates over the entries bucket by bucket, each chain head to tail
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }

    /// Removes every entry and restores the initial bucket count
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            unlink_chain(chain);
        }
        self.buckets = empty_buckets(self.config.initial_capacity);
        self.size = 0;
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Gets the bucket index for a key
    fn bucket_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        bucket_for(self.hash_builder.hash_one(key), self.buckets.len())
    }

    /// Maps `key` to `value`, returning the replaced value.
    ///
    /// An existing key keeps its place in its chain. A new key is appended to its chain, after
    /// which the table doubles as many times as needed to get back under the load factor.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let mut link = self.buckets.get_mut(index)?;
        while let Some(node) = link {
            if *node.entry.key() == key {
                return Some(node.entry.set_value(value));
            }
            link = &mut node.next;
        }
        *link = Some(Box::new(ChainNode {
            entry: Entry::new(key, value),
            next: None,
        }));
        self.size = self.size.saturating_add(1);
        self.grow();
        None
    }

    /// Retrieves the value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut link = self.buckets.get(self.bucket_index(key))?.as_deref();
        while let Some(node) = link {
            if node.entry.key().borrow() == key {
                return Some(node.entry.value());
            }
            link = node.next.as_deref();
        }
        None
    }

    /// Gets a mutable reference to the value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut link = self.buckets.get_mut(index)?.as_deref_mut();
        while let Some(node) = link {
            if node.entry.key().borrow() == key {
                return Some(node.entry.value_mut());
            }
            link = node.next.as_deref_mut();
        }
        None
    }

    /// Returns true if the map contains the given key
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes a key, returning its value.
    ///
    /// The node is unlinked by pointing its predecessor (or the bucket) at its successor. If the
    /// table is now under a quarter of its growth threshold it halves once.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut link = self.buckets.get_mut(index)?;
        loop {
            if link.as_ref()?.entry.key().borrow() == key {
                break;
            }
            link = &mut link.as_mut()?.next;
        }

        let mut node = link.take()?;
        *link = node.next.take();
        self.size = self.size.saturating_sub(1);
        self.shrink();

        let ChainNode { entry, .. } = *node;
        let (_, value) = entry.into_pair();
        Some(value)
    }

    /// Doubles the bucket array until `len` is back under the growth threshold
    #[allow(clippy::cast_precision_loss)]
    fn grow(&mut self) {
        while self.size as f64 > self.growth_threshold() {
            let capacity = self.capacity().saturating_mul(2);
            if capacity == self.capacity() {
                break;
            }
            self.rehash(capacity);
        }
    }

    /// Halves the bucket array if `len` fell under a quarter of the growth threshold
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn shrink(&mut self) {
        let floor = self.config.effective_min_capacity();
        if self.capacity() > floor && (self.size as f64) < self.growth_threshold() / 4.0 {
            self.rehash((self.capacity() / 2).max(floor));
        }
    }

    /// Moves every node into a fresh array of `capacity` buckets.
    ///
    /// Old buckets are drained in index order and nodes re-appended, so keys that share a
    /// bucket after the rehash keep their relative order.
    fn rehash(&mut self, capacity: usize) {
        let previous = mem::replace(&mut self.buckets, empty_buckets(capacity));
        tracing::debug!(from = previous.len(), to = capacity, len = self.size, "rehashing buckets");

        for mut chain in previous {
            while let Some(mut node) = chain {
                chain = node.next.take();
                let index = bucket_for(self.hash_builder.hash_one(node.entry.key()), capacity);
                if let Some(bucket) = self.buckets.get_mut(index) {
                    append(bucket, node);
                }
            }
        }
    }
}

impl<K, V, S> Drop for ChainedHashMap<K, V, S> {
    fn drop(&mut self) {
        for chain in &mut self.buckets {
            unlink_chain(chain);
        }
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for ChainedHashMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One line per bucket: `bin i: <k -> v> | <k -> v> | `
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(f, "bin {index}: ")?;
            let mut link = chain.as_deref();
            while let Some(node) = link {
                write!(f, "{} | ", node.entry)?;
                link = node.next.as_deref();
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K, V, S> Map<K, V> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
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
        self.size
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn entries(&self) -> Vec<Entry<K, V>> {
        self.iter()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect()
    }

    fn max_probe_depth(&self) -> usize {
        self.longest_chain()
    }
}

/// Iterator over the entries of a [`ChainedHashMap`] in bucket order
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Buckets not yet visited
    buckets: std::slice::Iter<'a, Chain<K, V>>,
    /// Next node of the bucket being walked
    chain: Option<&'a ChainNode<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain {
                self.chain = node.next.as_deref();
                return Some((node.entry.key(), node.entry.value()));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }
}
