//! Sizing policy for [`ChainedHashMap`](crate::ChainedHashMap)

use crate::error::{Error, Result};

/// Bucket count used when none is given
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor above which the bucket array doubles
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted maximum load factor.
///
/// Below it a single entry would keep the table doubling far past any useful size.
pub const MIN_MAX_LOAD_FACTOR: f64 = 0.01;

/// Shrinking never takes the bucket array below this many buckets
pub const DEFAULT_MIN_CAPACITY: usize = 4;

/// Capacity and load-factor settings for a chained hash map.
///
/// The map doubles when `len > capacity * max_load_factor` and halves when
/// `len < capacity * max_load_factor / 4`, never below `min_capacity`. A `min_capacity` larger
/// than `initial_capacity` is treated as `initial_capacity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashMapConfig {
    /// Number of buckets allocated up front and restored by `clear`
    pub initial_capacity: usize,
    /// Ratio of entries to buckets that triggers a doubling
    pub max_load_factor: f64,
    /// Floor for shrinking
    pub min_capacity: usize,
}

impl Default for HashMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl HashMapConfig {
    /// Creates the default configuration (16 buckets, 0.75 load factor)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of buckets
    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the maximum load factor
    #[must_use]
    pub const fn with_max_load_factor(mut self, load_factor: f64) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    /// Sets the shrink floor
    #[must_use]
    pub const fn with_min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity;
        self
    }

    /// Checks that the settings describe a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] or [`Error::ZeroMinCapacity`] for empty bucket counts and
    /// [`Error::InvalidLoadFactor`] for a load factor that is not finite or is below
    /// [`MIN_MAX_LOAD_FACTOR`].
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if self.min_capacity == 0 {
            return Err(Error::ZeroMinCapacity);
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < MIN_MAX_LOAD_FACTOR {
            return Err(Error::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }

    /// The shrink floor actually applied
    #[must_use]
    pub fn effective_min_capacity(&self) -> usize {
        self.min_capacity.min(self.initial_capacity).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HashMapConfig::new();
        assert_eq!(config.initial_capacity, 16);
        assert!((config.max_load_factor - 0.75).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(
            HashMapConfig::new().with_initial_capacity(0).validate(),
            Err(Error::ZeroCapacity)
        ));
        assert!(matches!(
            HashMapConfig::new().with_min_capacity(0).validate(),
            Err(Error::ZeroMinCapacity)
        ));
        assert!(matches!(
            HashMapConfig::new().with_max_load_factor(0.0).validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
        assert!(matches!(
            HashMapConfig::new()
                .with_max_load_factor(f64::NAN)
                .validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
    }

    #[test]
    fn test_rejects_vanishing_load_factor() {
        let tiny = HashMapConfig::new()
            .with_initial_capacity(4)
            .with_max_load_factor(1e-300);
        assert!(matches!(tiny.validate(), Err(Error::InvalidLoadFactor(_))));

        let floor = HashMapConfig::new().with_max_load_factor(MIN_MAX_LOAD_FACTOR);
        assert!(floor.validate().is_ok());
    }

    #[test]
    fn test_min_capacity_clamped_to_initial() {
        let config = HashMapConfig::new()
            .with_initial_capacity(2)
            .with_min_capacity(8);
        assert_eq!(config.effective_min_capacity(), 2);

        let config = HashMapConfig::new().with_initial_capacity(64);
        assert_eq!(config.effective_min_capacity(), DEFAULT_MIN_CAPACITY);
    }
}
