//! # Trimap
//!
//! One map contract, three interchangeable backings.
//!
//! - [`LinearMap`]: an unsorted list scanned front to back
//! - [`TreeMap`]: an unbalanced binary search tree ordered by a pluggable comparator
//! - [`ChainedHashMap`]: a hash table with separate chaining that doubles and halves with its
//!   load factor
//!
//! Code written against the [`Map`] trait can switch backing at runtime through [`Backing`],
//! which is how [`WordCounter`] compares them on real text.
//!
//! ## Basic Usage
//!
//! ```rust
//! use trimap::{Backing, ChainedHashMap, Map, TreeMap};
//!
//! let mut map = ChainedHashMap::new();
//! map.insert("apple".to_string(), 1);
//! map.insert("banana".to_string(), 2);
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! map.insert("apple".to_string(), 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//!
//! // Trees export in key order
//! let tree: TreeMap<_, _> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
//! assert_eq!(Map::keys(&tree), vec![1, 2, 3]);
//!
//! // Any backing behind the same contract
//! for backing in Backing::ALL {
//!     let mut counts = backing.build::<String, usize>();
//!     counts.put("word".to_string(), 1);
//!     assert_eq!(counts.get(&"word".to_string()), Some(&1));
//! }
//! ```
//!
//! ## Word Counting
//!
//! ```rust
//! use trimap::{Backing, WordCounter};
//!
//! let mut counter = WordCounter::new(Backing::Hash);
//! let words = counter.read_words("to be or not to be".as_bytes()).unwrap();
//! counter.build_map(&words);
//! assert_eq!(counter.count("be"), 2);
//! assert_eq!(counter.unique_word_count(), 4);
//! ```

/// Chained hash table
mod chained_hash_map;
/// Sizing policy for the hash table
mod config;
/// The key-value pair stored by every backing
mod entry;
/// Crate error type
mod error;
/// Predictable hashing for integer keys
mod hasher;
/// Unsorted list backing
mod linear_map;
/// The shared map contract
mod map;
/// Binary search tree backing
mod tree_map;
/// Word frequency counting
mod word_counter;

pub use chained_hash_map::{ChainedHashMap, DefaultHashBuilder};
pub use config::{
    DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_MIN_CAPACITY, HashMapConfig,
    MIN_MAX_LOAD_FACTOR,
};
pub use entry::Entry;
pub use error::{Error, Result};
pub use hasher::{BuildIdentityHasher, IdentityHasher};
pub use linear_map::LinearMap;
pub use map::{Backing, Map};
pub use tree_map::TreeMap;
pub use word_counter::WordCounter;
