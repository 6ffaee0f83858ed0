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

//! Estimator contracts shared by sketches and their exact baselines.
//!
//! Each family of sketch is reached through one narrow trait, so a comparison can drive a sketch
//! and its ground-truth baseline through the same calls:
//!
//! | Family      | Trait                    | Sketch                                      | Baseline                                  |
//! |-------------|--------------------------|---------------------------------------------|-------------------------------------------|
//! | Membership  | [`MembershipEstimator`]  | [`BloomSketch`](crate::bloom::BloomSketch)  | [`ExactSet`](crate::exact::ExactSet)      |
//! | Frequency   | [`FrequencyEstimator`]   | [`CountMinSketch`](crate::countmin::CountMinSketch) | [`ExactFrequencies`](crate::exact::ExactFrequencies) |
//! | Cardinality | [`CardinalityEstimator`] | [`HyperLogLogSketch`](crate::hll::HyperLogLogSketch) | [`ExactSet`](crate::exact::ExactSet) |
//!
//! `size` always reports a byte footprint. Sketches derive it from their dimensions; baselines
//! derive it from the bytes of the keys they hold. Neither serializes anything.

/// Approximate set membership.
pub trait MembershipEstimator<T: ?Sized> {
    /// Records `item` as a member.
    fn add(&mut self, item: &T);

    /// Returns whether `item` may be a member. Never false for an added item.
    fn contains(&self, item: &T) -> bool;

    /// Byte footprint of the structure.
    fn size(&self) -> usize;
}

/// Approximate frequency counting.
pub trait FrequencyEstimator<T: ?Sized> {
    /// Adds `delta` occurrences of `item`.
    fn increment_by(&mut self, item: &T, delta: u64);

    /// Adds one occurrence of `item`.
    fn increment(&mut self, item: &T) {
        self.increment_by(item, 1);
    }

    /// Returns the estimated number of occurrences of `item`. Never below the true count.
    fn estimate(&self, item: &T) -> u64;

    /// Byte footprint of the structure.
    fn size(&self) -> usize;
}

/// Approximate distinct counting.
pub trait CardinalityEstimator<T: ?Sized> {
    /// Records one occurrence of `item`.
    fn add(&mut self, item: &T);

    /// Returns the estimated number of distinct items recorded.
    fn cardinality(&self) -> f64;

    /// Byte footprint of the structure.
    fn size(&self) -> usize;
}

/// Number of payload bytes a value contributes to a footprint estimate.
pub trait ByteSize {
    /// Returns the payload byte count.
    fn byte_size(&self) -> usize;
}

impl ByteSize for str {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for [u8] {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

macro_rules! impl_byte_size_for_int {
    ($($t:ty),*) => {
        $(
            impl ByteSize for $t {
                fn byte_size(&self) -> usize {
                    size_of::<$t>()
                }
            }
        )*
    };
}

impl_byte_size_for_int!(u8, u16, u32, u64, i8, i16, i32, i64, usize, isize);

impl<T: ByteSize + ?Sized> ByteSize for &T {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_size() {
        assert_eq!("abc".byte_size(), 3);
        assert_eq!(String::from("abcd").byte_size(), 4);
        assert_eq!(42u64.byte_size(), 8);
        assert_eq!(7i32.byte_size(), 4);
        assert_eq!((&"xy").byte_size(), 2);
        assert_eq!(b"hello"[..].byte_size(), 5);
    }
}
