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

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::ENTRY_OVERHEAD_BYTES;
use super::HEADER_BYTES;
use crate::estimator::ByteSize;
use crate::estimator::FrequencyEstimator;

const COUNT_BYTES: usize = size_of::<u64>();

/// Exact per-item occurrence counts.
///
/// # Examples
///
/// ```
/// use sketchbench::exact::ExactFrequencies;
///
/// let mut counts = ExactFrequencies::new();
/// for item in ["b", "a", "b", "c", "a", "b"] {
///     counts.increment(&item);
/// }
///
/// assert_eq!(counts.count("b"), 3);
/// assert_eq!(counts.top_k(2), vec![("b", 3), ("a", 2)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExactFrequencies<T> {
    counts: HashMap<T, u64>,
    total_weight: u64,
    payload_bytes: usize,
}

impl<T> ExactFrequencies<T> {
    /// Creates an empty frequency map.
    pub fn new() -> Self {
        ExactFrequencies {
            counts: HashMap::new(),
            total_weight: 0,
            payload_bytes: 0,
        }
    }

    /// Returns the number of distinct items counted.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the sum of all counts.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns the byte footprint estimate of the map.
    pub fn size(&self) -> usize {
        HEADER_BYTES
            + self.counts.len() * (ENTRY_OVERHEAD_BYTES + COUNT_BYTES)
            + self.payload_bytes
    }

    /// Iterates over `(item, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.counts.iter().map(|(item, &count)| (item, count))
    }
}

impl<T: Hash + Eq + Clone + ByteSize> ExactFrequencies<T> {
    /// Adds one occurrence of `item`.
    pub fn increment(&mut self, item: &T) {
        self.increment_by(item, 1);
    }

    /// Adds `delta` occurrences of `item`.
    ///
    /// Counts saturate at `u64::MAX`, matching the sketches they are compared against.
    pub fn increment_by(&mut self, item: &T, delta: u64) {
        if delta == 0 {
            return;
        }
        self.total_weight = self.total_weight.saturating_add(delta);
        if let Some(count) = self.counts.get_mut(item) {
            *count = count.saturating_add(delta);
            return;
        }
        self.payload_bytes += item.byte_size();
        self.counts.insert(item.clone(), delta);
    }
}

impl<T: Hash + Eq> ExactFrequencies<T> {
    /// Returns the exact count of `item`, 0 if never counted.
    pub fn count<Q>(&self, item: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(item).copied().unwrap_or(0)
    }
}

impl<T: Ord + Clone> ExactFrequencies<T> {
    /// Returns the `n` most frequent items by a full sort.
    ///
    /// Items are ordered by descending count; equal counts are ordered by ascending item.
    pub fn top_k(&self, n: usize) -> Vec<(T, u64)> {
        let mut rows: Vec<(&T, u64)> = self.iter().collect();
        rows.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)));
        rows.into_iter()
            .take(n)
            .map(|(item, count)| (item.clone(), count))
            .collect()
    }
}

impl<T: Hash + Eq + Clone + ByteSize> FrequencyEstimator<T> for ExactFrequencies<T> {
    fn increment_by(&mut self, item: &T, delta: u64) {
        ExactFrequencies::increment_by(self, item, delta);
    }

    fn estimate(&self, item: &T) -> u64 {
        self.count(item)
    }

    fn size(&self) -> usize {
        ExactFrequencies::size(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut counts = ExactFrequencies::new();
        counts.increment(&1u64);
        counts.increment_by(&1u64, 4);
        counts.increment_by(&2u64, 0);
        assert_eq!(counts.count(&1u64), 5);
        assert_eq!(counts.count(&2u64), 0);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.total_weight(), 5);
    }

    #[test]
    fn test_counts_saturate() {
        let mut counts = ExactFrequencies::new();
        counts.increment_by(&1u64, u64::MAX);
        counts.increment_by(&1u64, 2);
        counts.increment(&2u64);
        assert_eq!(counts.count(&1u64), u64::MAX);
        assert_eq!(counts.count(&2u64), 1);
        assert_eq!(counts.total_weight(), u64::MAX);
    }

    #[test]
    fn test_top_k_tie_break() {
        let mut counts = ExactFrequencies::new();
        for item in [30u64, 10, 20, 20, 10, 30, 40] {
            counts.increment(&item);
        }
        assert_eq!(counts.top_k(3), vec![(10, 2), (20, 2), (30, 2)]);
        assert_eq!(counts.top_k(10).len(), 4);
        assert!(counts.top_k(0).is_empty());
    }

    #[test]
    fn test_size() {
        let mut counts = ExactFrequencies::new();
        assert_eq!(counts.size(), HEADER_BYTES);
        counts.increment(&String::from("abc"));
        counts.increment(&String::from("abc"));
        assert_eq!(counts.size(), HEADER_BYTES + ENTRY_OVERHEAD_BYTES + COUNT_BYTES + 3);
    }
}
