//! Crate error type
//!
//! Map operations never fail: a missing key is `None`, not an error. Errors only come from
//! building a map with a bad configuration, naming an unknown backing, or the I/O done by the
//! word counter.

use thiserror::Error;

/// Errors produced by this crate
#[derive(Debug, Error)]
pub enum Error {
    /// The maximum load factor must be finite and at least `MIN_MAX_LOAD_FACTOR`
    #[error("invalid max load factor {0}: must be finite and at least 0.01")]
    InvalidLoadFactor(f64),

    /// A hash map needs at least one bucket
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    /// The shrink floor must be at least one bucket
    #[error("minimum capacity must be at least 1")]
    ZeroMinCapacity,

    /// The name does not match any backing strategy
    #[error("unknown backing `{0}` (expected one of: linear, tree, hash)")]
    UnknownBacking(String),

    /// Reading words or writing a report failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
