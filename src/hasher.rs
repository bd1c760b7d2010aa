//! A hasher that maps integers to their own magnitude.
//!
//! With it, an integer key `k` lands in bucket `|k| mod capacity`, which makes bucket layouts
//! predictable for sequential integer workloads and for inspecting a table by eye. Anything else
//! is folded with a multiply-by-31 polynomial.

use std::hash::{BuildHasher, Hasher};

/// Multiplier used to fold successive writes
const FOLD_MULTIPLIER: u64 = 31;

/// Hashes integers to their magnitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher(u64);

impl IdentityHasher {
    /// Mixes one more word into the state
    fn fold(&mut self, word: u64) {
        self.0 = self.0.wrapping_mul(FOLD_MULTIPLIER).wrapping_add(word);
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.fold(u64::from(*byte));
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.fold(u64::from(i));
    }

    fn write_u16(&mut self, i: u16) {
        self.fold(u64::from(i));
    }

    fn write_u32(&mut self, i: u32) {
        self.fold(u64::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_u128(&mut self, i: u128) {
        self.fold(i as u64);
    }

    fn write_usize(&mut self, i: usize) {
        self.fold(u64::try_from(i).unwrap_or(u64::MAX));
    }

    fn write_i8(&mut self, i: i8) {
        self.fold(u64::from(i.unsigned_abs()));
    }

    fn write_i16(&mut self, i: i16) {
        self.fold(u64::from(i.unsigned_abs()));
    }

    fn write_i32(&mut self, i: i32) {
        self.fold(u64::from(i.unsigned_abs()));
    }

    fn write_i64(&mut self, i: i64) {
        self.fold(i.unsigned_abs());
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_i128(&mut self, i: i128) {
        self.fold(i.unsigned_abs() as u64);
    }

    fn write_isize(&mut self, i: isize) {
        self.fold(u64::try_from(i.unsigned_abs()).unwrap_or(u64::MAX));
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Builds [`IdentityHasher`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}
