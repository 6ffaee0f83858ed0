// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::f64::consts::LN_2;
use std::hash::Hash;

use crate::error::Error;
use crate::estimator::MembershipEstimator;
use crate::hash::DEFAULT_SEED;
use crate::hash::HashFamily;

const MAX_NUM_BITS: u64 = (1u64 << 35) - 64; // ~4 GiB of bits
const MAX_NUM_HASHES: u32 = 100;

/// A fixed-size Bloom filter.
///
/// Provides membership queries with:
/// - No false negatives (added items always return `true`)
/// - A false positive rate tuned by the construction parameters
/// - Constant space usage
#[derive(Debug, Clone, PartialEq)]
pub struct BloomSketch {
    /// One hash function per tested bit (k)
    hashes: HashFamily,
    /// Total number of bits in the filter (m)
    num_bits: u64,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Bit array packed into u64 words, `ceil(num_bits / 64)` long
    bit_array: Vec<u64>,
    expected_insertions: u64,
    target_fpp: f64,
}

impl BloomSketch {
    /// Creates a filter sized for `expected_insertions` items at false positive probability `fpp`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `expected_insertions` is 0, `fpp` is not in (0, 1), or the
    /// resulting bit array would be too large.
    pub fn new(expected_insertions: u64, fpp: f64) -> Result<Self, Error> {
        Self::with_seed(expected_insertions, fpp, DEFAULT_SEED)
    }

    /// Like [`new`](Self::new), hashing with the given seed.
    pub fn with_seed(expected_insertions: u64, fpp: f64, seed: u32) -> Result<Self, Error> {
        if expected_insertions == 0 {
            return Err(Error::out_of_range(
                "expected_insertions",
                expected_insertions,
                "[1, inf)",
            ));
        }
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(Error::out_of_range("fpp", fpp, "(0, 1)"));
        }

        let num_bits = Self::suggest_num_bits(expected_insertions, fpp);
        if num_bits > MAX_NUM_BITS {
            return Err(Error::invalid_parameter(format!(
                "bloom filter of {num_bits} bits exceeds the {MAX_NUM_BITS} bit limit"
            )));
        }
        let num_hashes = Self::suggest_num_hashes(expected_insertions, num_bits);

        let mut sketch = Self::make(num_bits, num_hashes, seed);
        sketch.expected_insertions = expected_insertions;
        sketch.target_fpp = fpp;
        Ok(sketch)
    }

    /// Creates a filter with an explicit bit count and number of hash functions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either dimension is 0 or out of the supported range.
    pub fn with_size(num_bits: u64, num_hashes: u32, seed: u32) -> Result<Self, Error> {
        if !(1..=MAX_NUM_BITS).contains(&num_bits) {
            return Err(Error::out_of_range(
                "num_bits",
                num_bits,
                &format!("[1, {MAX_NUM_BITS}]"),
            ));
        }
        if !(1..=MAX_NUM_HASHES).contains(&num_hashes) {
            return Err(Error::out_of_range(
                "num_hashes",
                num_hashes,
                &format!("[1, {MAX_NUM_HASHES}]"),
            ));
        }
        Ok(Self::make(num_bits, num_hashes, seed))
    }

    /// Suggests the number of bits for `max_items` at false positive probability `fpp`.
    ///
    /// Formula: `m = ceil(-n * ln(p) / ln(2)^2)`, at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchbench::bloom::BloomSketch;
    /// assert_eq!(BloomSketch::suggest_num_bits(1000, 0.01), 9586);
    /// ```
    pub fn suggest_num_bits(max_items: u64, fpp: f64) -> u64 {
        let n = max_items as f64;
        let bits = (-n * fpp.ln() / (LN_2 * LN_2)).ceil();
        (bits as u64).max(1)
    }

    /// Suggests the number of hash functions for `max_items` in `num_bits` bits.
    ///
    /// Formula: `k = round((m / n) * ln(2))`, clamped to `[1, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchbench::bloom::BloomSketch;
    /// assert_eq!(BloomSketch::suggest_num_hashes(1000, 10000), 7); // k ≈ 6.93
    /// ```
    pub fn suggest_num_hashes(max_items: u64, num_bits: u64) -> u32 {
        let m = num_bits as f64;
        let n = max_items.max(1) as f64;
        let k = (m / n * LN_2).round();
        (k as u32).clamp(1, MAX_NUM_HASHES)
    }

    // ========================================================================
    // Update and Query Operations
    // ========================================================================

    /// Adds an item. Adding the same item again changes nothing.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) {
        let base = self.hashes.base(item);
        for i in 0..self.hashes.count() {
            let bit_index = base.nth(i) % self.num_bits;
            self.set_bit(bit_index);
        }
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** added (or false positive)
    /// - `false`: Item was **definitely not** added
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }
        self.hashes
            .indexes(item, self.num_bits)
            .all(|bit_index| self.get_bit(bit_index))
    }

    /// Returns the packed byte footprint of the bit array, `ceil(m / 8)`.
    pub fn size(&self) -> usize {
        self.num_bits.div_ceil(8) as usize
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether no item has been added.
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the total number of bits in the filter (m).
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions used (k).
    pub fn num_hashes(&self) -> u32 {
        self.hashes.count()
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.hashes.seed()
    }

    /// Returns the number of insertions the filter was sized for, or 0 if built by size.
    pub fn expected_insertions(&self) -> u64 {
        self.expected_insertions
    }

    /// Returns the false positive probability the filter was sized for, or NaN if built by size.
    pub fn target_fpp(&self) -> f64 {
        self.target_fpp
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits as f64
    }

    /// Estimates the current false positive probability from the load factor.
    ///
    /// A filter with a fraction `f` of its bits set reports a non-member as present with
    /// probability about `f^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(self.num_hashes() as i32)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn make(num_bits: u64, num_hashes: u32, seed: u32) -> Self {
        let num_words = num_bits.div_ceil(64) as usize;
        BloomSketch {
            hashes: HashFamily::new(seed, num_hashes),
            num_bits,
            num_bits_set: 0,
            bit_array: vec![0u64; num_words],
            expected_insertions: 0,
            target_fpp: f64::NAN,
        }
    }

    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index / 64) as usize;
        let mask = 1u64 << (bit_index % 64);
        (self.bit_array[word_index] & mask) != 0
    }

    fn set_bit(&mut self, bit_index: u64) {
        let word_index = (bit_index / 64) as usize;
        let mask = 1u64 << (bit_index % 64);
        if (self.bit_array[word_index] & mask) == 0 {
            self.bit_array[word_index] |= mask;
            self.num_bits_set += 1;
        }
    }
}

impl<T: Hash + ?Sized> MembershipEstimator<T> for BloomSketch {
    fn add(&mut self, item: &T) {
        BloomSketch::add(self, item);
    }

    fn contains(&self, item: &T) -> bool {
        BloomSketch::contains(self, item)
    }

    fn size(&self) -> usize {
        BloomSketch::size(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_dimensions_from_accuracy() {
        let filter = BloomSketch::new(1000, 0.05).unwrap();
        // -1000 * ln(0.05) / ln(2)^2 = 6235.2
        assert_eq!(filter.num_bits(), 6236);
        // 6.236 * ln(2) = 4.32
        assert_eq!(filter.num_hashes(), 4);
        assert_eq!(filter.size(), 780);
        assert_eq!(filter.expected_insertions(), 1000);
        assert_eq!(filter.target_fpp(), 0.05);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_tiny_filter_has_at_least_one_bit_and_hash() {
        let filter = BloomSketch::new(1, 0.9).unwrap();
        assert!(filter.num_bits() >= 1);
        assert!(filter.num_hashes() >= 1);
    }

    #[test]
    fn test_with_size() {
        let filter = BloomSketch::with_size(1024, 5, 7).unwrap();
        assert_eq!(filter.num_bits(), 1024);
        assert_eq!(filter.num_hashes(), 5);
        assert_eq!(filter.seed(), 7);
        assert_eq!(filter.size(), 128);
        assert!(filter.target_fpp().is_nan());
    }

    #[test]
    fn test_add_and_contains() {
        let mut filter = BloomSketch::new(100, 0.01).unwrap();
        assert!(!filter.contains("apple"));
        filter.add("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filter = BloomSketch::new(100, 0.01).unwrap();
        filter.add("apple");
        let once = filter.clone();
        filter.add("apple");
        assert_eq!(filter, once);
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomSketch::with_size(1000, 5, DEFAULT_SEED).unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);

        filter.add("test");
        assert!(filter.bits_used() > 0);
        assert!(filter.bits_used() <= 5);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let cases = [(0, 0.01), (100, 0.0), (100, 1.0), (100, 1.5), (100, f64::NAN)];
        for (n, p) in cases {
            let err = BloomSketch::new(n, p).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "n={n}, p={p}");
        }
        assert!(BloomSketch::with_size(0, 3, 0).is_err());
        assert!(BloomSketch::with_size(64, 0, 0).is_err());
    }

    #[test]
    fn test_too_large() {
        let err = BloomSketch::new(u64::MAX / 2, 1e-9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
