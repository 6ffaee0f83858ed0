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

//! Hash family shared by every sketch.
//!
//! All sketches index their tables through [`HashFamily`]: a single 128-bit MurmurHash3 of the key
//! is split into two 64-bit halves `h1` and `h2`, and the `i`-th hash is `h1 + i * h2`
//! (Kirsch-Mitzenmacher double hashing). This keeps one hash computation per key no matter how
//! many bit positions or rows a sketch touches.

use std::hash::Hash;
use std::hash::Hasher;

/// The seed 9001 is the prime used by default for every sketch update.
///
/// Two sketches can only be compared bucket-for-bucket (or merged) when they hash with the same
/// seed.
pub const DEFAULT_SEED: u32 = 9001;

/// A family of `count` hash functions derived from one seed.
///
/// # Examples
///
/// ```
/// use sketchbench::hash::HashFamily;
///
/// let family = HashFamily::new(42, 4);
/// let first = family.hash("apple", 0);
/// assert_eq!(first, family.hash("apple", 0));
/// assert_ne!(first, family.hash("apple", 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFamily {
    seed: u32,
    count: u32,
}

impl HashFamily {
    /// Creates a family of `count` hash functions keyed by `seed`.
    pub fn new(seed: u32, count: u32) -> Self {
        Self { seed, count }
    }

    /// Returns the seed of this family.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns how many hash functions this family provides.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Computes the two base hash values of `key`.
    pub fn base<T: Hash + ?Sized>(&self, key: &T) -> BaseHash {
        let mut hasher = mur3::Hasher128::with_seed(self.seed);
        // Inputs of at most 8 bytes never touch the second lane, which cancels to zero when the
        // seed equals the input length. A leading 16-byte seed block mixes both lanes first.
        hasher.write_u128(u128::from(self.seed));
        key.hash(&mut hasher);
        let (h1, h2) = hasher.finish128();
        // An odd step keeps the index sequence from collapsing when h2 shares factors with the
        // table size.
        BaseHash { h1, h2: h2 | 1 }
    }

    /// Returns the `index`-th hash of `key`.
    ///
    /// Indexes at or beyond [`count`](Self::count) are still well defined; sketches never ask
    /// for them.
    pub fn hash<T: Hash + ?Sized>(&self, key: &T, index: u32) -> u64 {
        self.base(key).nth(index)
    }

    /// Returns the `count` hashes of `key` reduced modulo `modulus`.
    pub fn indexes<T: Hash + ?Sized>(&self, key: &T, modulus: u64) -> impl Iterator<Item = u64> {
        let base = self.base(key);
        (0..self.count).map(move |i| base.nth(i) % modulus)
    }
}

/// The two halves of a key's 128-bit hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseHash {
    h1: u64,
    h2: u64,
}

impl BaseHash {
    /// Returns the first 64-bit half, usable as a single strong hash.
    pub fn h1(&self) -> u64 {
        self.h1
    }

    /// Returns `h1 + i * h2` with wrapping arithmetic.
    pub fn nth(&self, i: u32) -> u64 {
        self.h1.wrapping_add(u64::from(i).wrapping_mul(self.h2))
    }
}

/// Hashes raw bytes with MurmurHash3 x64/128 and returns the first half.
pub(crate) fn hash_bytes(bytes: &[u8], seed: u32) -> u64 {
    let mut hasher = mur3::Hasher128::with_seed(seed);
    hasher.write(bytes);
    hasher.finish128().0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur_reference_vectors() {
        // remainder > 8
        let key = "The quick brown fox jumps over the lazy dog";
        let (h1, h2) = mur3::murmurhash3_x64_128(key.as_bytes(), 0);
        assert_eq!(h1, 0xe34bbc7bbc071b6c);
        assert_eq!(h2, 0x7a433ca9c49a9347);

        // change one bit
        let key = "The quick brown fox jumps over the lazy eog";
        let (h1, h2) = mur3::murmurhash3_x64_128(key.as_bytes(), 0);
        assert_eq!(h1, 0x362108102c62d1c9);
        assert_eq!(h2, 0x3285cd100292b305);
    }

    #[test]
    fn test_hash_bytes_matches_one_shot() {
        let key = b"The quick brown fox jumps over the lazy dog";
        assert_eq!(hash_bytes(key, 0), 0xe34bbc7bbc071b6c);
    }

    #[test]
    fn test_double_hashing() {
        let family = HashFamily::new(DEFAULT_SEED, 3);
        let base = family.base("key");
        assert_eq!(family.hash("key", 0), base.h1());
        assert_eq!(
            family.hash("key", 2),
            base.h1().wrapping_add(2u64.wrapping_mul(base.h2))
        );
    }

    #[test]
    fn test_step_is_odd() {
        let family = HashFamily::new(1, 8);
        for i in 0..1000u64 {
            assert_eq!(family.base(&i).h2 & 1, 1);
        }
    }

    /// Returns how far the share of odd `h1` values strays from one half, in units of five
    /// standard deviations.
    fn odd_skew<K: Hash>(family: &HashFamily, keys: impl Iterator<Item = K>) -> f64 {
        let (mut odd, mut total) = (0u32, 0u32);
        for key in keys {
            odd += (family.base(&key).h1() & 1) as u32;
            total += 1;
        }
        let share = f64::from(odd) / f64::from(total);
        (share - 0.5).abs() / (5.0 * 0.5 / f64::from(total).sqrt())
    }

    #[test]
    fn test_low_bit_balanced_for_every_seed() {
        // Seeds equal to the encoded key length used to zero the second lane for short keys.
        for seed in 0..64u32 {
            let family = HashFamily::new(seed, 1);
            for skew in [
                odd_skew(&family, 0..=255u8),
                odd_skew(&family, 0..4096u32),
                odd_skew(&family, 0..4096u64),
                odd_skew(&family, (0..4096u32).map(|i| format!("{i:07}"))),
            ] {
                assert!(skew < 1.0, "seed {seed}: odd share skew {skew}");
            }
        }
    }

    #[test]
    fn test_step_independent_of_first_hash() {
        let family = HashFamily::new(8, 2);
        let linked = (0..1000u64)
            .map(|i| family.base(&i))
            .filter(|base| base.h2 == (base.h1.wrapping_add(base.h1 >> 1)) | 1)
            .count();
        assert_eq!(linked, 0);
    }

    #[test]
    fn test_seed_changes_hash() {
        let a = HashFamily::new(1, 1);
        let b = HashFamily::new(2, 1);
        assert_ne!(a.hash("key", 0), b.hash("key", 0));
    }

    #[test]
    fn test_indexes_in_range() {
        let family = HashFamily::new(DEFAULT_SEED, 7);
        let indexes: Vec<u64> = family.indexes("key", 100).collect();
        assert_eq!(indexes.len(), 7);
        assert!(indexes.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_indexes_spread_uniformly() {
        let family = HashFamily::new(DEFAULT_SEED, 4);
        let mut buckets = [0u32; 16];
        for i in 0..16_000u64 {
            for idx in family.indexes(&i, 16) {
                buckets[idx as usize] += 1;
            }
        }
        // 4000 expected per bucket
        for count in buckets {
            assert!((3500..4500).contains(&count), "bucket count {count}");
        }
    }
}
