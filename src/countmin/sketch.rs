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

use std::hash::Hash;

use super::top_k::TopK;
use crate::error::Error;
use crate::estimator::ByteSize;
use crate::estimator::FrequencyEstimator;
use crate::hash::BaseHash;
use crate::hash::HashFamily;

const MAX_TABLE_ENTRIES: usize = 1 << 30;
const COUNTER_WIDTH_BYTES: usize = size_of::<u64>();

/// Count-Min sketch for estimating item frequencies.
///
/// `T` is the item type remembered by the optional heavy-hitter tracker. Queries accept any
/// value that hashes like a `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMinSketch<T> {
    depth: u32,
    width: u32,
    /// One hash function per row
    hashes: HashFamily,
    total_weight: u64,
    /// Row-major `depth x width` counters
    counts: Vec<u64>,
    heavy_hitters: Option<TopK<T>>,
}

impl<T> CountMinSketch<T> {
    /// Creates a sketch with `depth` rows of `width` counters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `depth` or `width` is 0, or the table would exceed the
    /// supported number of counters.
    pub fn new(depth: u32, width: u32, seed: u32) -> Result<Self, Error> {
        if depth < 1 {
            return Err(Error::out_of_range("depth", depth, "[1, inf)"));
        }
        if width < 1 {
            return Err(Error::out_of_range("width", width, "[1, inf)"));
        }
        let entries = (depth as usize)
            .checked_mul(width as usize)
            .filter(|&entries| entries < MAX_TABLE_ENTRIES)
            .ok_or_else(|| {
                Error::invalid_parameter(format!(
                    "depth * width must be < {MAX_TABLE_ENTRIES}, got {depth} * {width}"
                ))
            })?;

        Ok(CountMinSketch {
            depth,
            width,
            hashes: HashFamily::new(seed, depth),
            total_weight: 0,
            counts: vec![0u64; entries],
            heavy_hitters: None,
        })
    }

    /// Creates a sketch whose estimates exceed the true frequency by at most
    /// `epsilon * total_weight` with probability at least `1 - delta`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `epsilon` or `delta` is not in (0, 1).
    pub fn with_accuracy(epsilon: f64, delta: f64, seed: u32) -> Result<Self, Error> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(Error::out_of_range("epsilon", epsilon, "(0, 1)"));
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::out_of_range("delta", delta, "(0, 1)"));
        }
        Self::new(Self::suggest_depth(delta), Self::suggest_width(epsilon), seed)
    }

    /// Enables heavy-hitter tracking of the `capacity` items with the largest estimates.
    ///
    /// Items counted before this call are not tracked.
    pub fn with_heavy_hitters(mut self, capacity: usize) -> Self {
        self.heavy_hitters = Some(TopK::new(capacity));
        self
    }

    /// Suggests the width for relative error `epsilon`: `ceil(e / epsilon)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchbench::countmin::CountMinSketch;
    /// assert_eq!(CountMinSketch::<u64>::suggest_width(0.01), 272);
    /// ```
    pub fn suggest_width(epsilon: f64) -> u32 {
        (std::f64::consts::E / epsilon).ceil() as u32
    }

    /// Suggests the depth for failure probability `delta`: `ceil(ln(1 / delta))`, at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchbench::countmin::CountMinSketch;
    /// assert_eq!(CountMinSketch::<u64>::suggest_depth(0.01), 5);
    /// ```
    pub fn suggest_depth(delta: f64) -> u32 {
        ((1.0 / delta).ln().ceil() as u32).max(1)
    }

    /// Returns the number of rows (d).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the number of counters per row (w).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.hashes.seed()
    }

    /// Returns the total weight added to the sketch.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns true if the sketch has not seen any updates.
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Returns the relative error (epsilon) implied by the width.
    pub fn relative_error(&self) -> f64 {
        std::f64::consts::E / self.width as f64
    }

    /// Returns the heavy-hitter capacity, if tracking is enabled.
    pub fn heavy_hitter_capacity(&self) -> Option<usize> {
        self.heavy_hitters.as_ref().map(TopK::capacity)
    }

    /// Returns the estimated frequency of the given item.
    ///
    /// The estimate is the minimum of the item's counters and is never below its true
    /// frequency.
    pub fn estimate<Q: Hash + ?Sized>(&self, item: &Q) -> u64 {
        let base = self.hashes.base(item);
        (0..self.depth)
            .map(|row| self.counts[self.counter_index(&base, row)])
            .min()
            .unwrap_or(0)
    }

    /// Returns the upper bound on the true frequency of the given item.
    pub fn upper_bound<Q: Hash + ?Sized>(&self, item: &Q) -> u64 {
        let error = (self.relative_error() * self.total_weight as f64) as u64;
        self.estimate(item).saturating_add(error)
    }

    /// Returns the counters of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= depth`.
    pub fn row(&self, row: u32) -> &[u64] {
        assert!(row < self.depth, "row {row} out of range for depth {}", self.depth);
        let width = self.width as usize;
        let start = row as usize * width;
        &self.counts[start..start + width]
    }

    fn counter_index(&self, base: &BaseHash, row: u32) -> usize {
        let bucket = base.nth(row) % u64::from(self.width);
        row as usize * self.width as usize + bucket as usize
    }
}

impl<T: Hash + Eq + Clone> CountMinSketch<T> {
    /// Adds one occurrence of `item`.
    pub fn increment(&mut self, item: &T) {
        self.increment_by(item, 1);
    }

    /// Adds `delta` occurrences of `item`.
    ///
    /// Counters saturate at `u64::MAX` rather than wrap, so they never decrease.
    pub fn increment_by(&mut self, item: &T, delta: u64) {
        if delta == 0 {
            return;
        }
        self.total_weight = self.total_weight.saturating_add(delta);
        let base = self.hashes.base(item);
        for row in 0..self.depth {
            let index = self.counter_index(&base, row);
            self.counts[index] = self.counts[index].saturating_add(delta);
        }

        if self.heavy_hitters.is_some() {
            let estimate = self.estimate(item);
            if let Some(heavy_hitters) = self.heavy_hitters.as_mut() {
                heavy_hitters.offer(item, estimate);
            }
        }
    }
}

impl<T: Hash + Ord + Clone> CountMinSketch<T> {
    /// Returns up to `n` tracked heavy hitters with their current estimates.
    ///
    /// Entries are ordered by descending estimate, ties by ascending item. Returns an empty
    /// vector when tracking is disabled.
    pub fn top_k(&self, n: usize) -> Vec<(T, u64)> {
        let Some(heavy_hitters) = &self.heavy_hitters else {
            return vec![];
        };
        let mut rows: Vec<(T, u64)> = heavy_hitters
            .items()
            .map(|item| (item.clone(), self.estimate(item)))
            .collect();
        rows.sort_by(|(a, a_est), (b, b_est)| b_est.cmp(a_est).then_with(|| a.cmp(b)));
        rows.truncate(n);
        rows
    }
}

impl<T: ByteSize> CountMinSketch<T> {
    /// Returns the byte footprint: `depth * width * 8`, plus the tracked heavy hitters' item
    /// bytes and one counter each.
    pub fn size(&self) -> usize {
        let table = self.counts.len() * COUNTER_WIDTH_BYTES;
        let heavy_hitters = self.heavy_hitters.as_ref().map_or(0, |top| {
            top.items()
                .map(|item| item.byte_size() + COUNTER_WIDTH_BYTES)
                .sum()
        });
        table + heavy_hitters
    }
}

impl<T: Hash + Eq + Clone + ByteSize> FrequencyEstimator<T> for CountMinSketch<T> {
    fn increment_by(&mut self, item: &T, delta: u64) {
        CountMinSketch::increment_by(self, item, delta);
    }

    fn estimate(&self, item: &T) -> u64 {
        CountMinSketch::estimate(self, item)
    }

    fn size(&self) -> usize {
        CountMinSketch::size(self)
    }
}
