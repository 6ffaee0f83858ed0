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

use super::estimator;
use crate::error::Error;
use crate::estimator::CardinalityEstimator;
use crate::hash::DEFAULT_SEED;
use crate::hash::HashFamily;

const MIN_LOG2M: u8 = 4;
const MAX_LOG2M: u8 = 26;
/// Registers hold at most `64 - MIN_LOG2M + 1 = 61`, which fits in 6 bits.
const REGISTER_WIDTH_BITS: usize = 6;

/// A dense HyperLogLog sketch with `2^log2m` registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperLogLogSketch {
    log2m: u8,
    hashes: HashFamily,
    registers: Vec<u8>,
}

impl HyperLogLogSketch {
    /// Creates a sketch with relative standard error of about `relative_error`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `relative_error` is not in (0, 1), or is so small that more
    /// than `2^26` registers would be needed.
    pub fn new(relative_error: f64) -> Result<Self, Error> {
        Self::with_seed(relative_error, DEFAULT_SEED)
    }

    /// Like [`new`](Self::new), hashing with the given seed.
    pub fn with_seed(relative_error: f64, seed: u32) -> Result<Self, Error> {
        if !(relative_error > 0.0 && relative_error < 1.0) {
            return Err(Error::out_of_range(
                "relative_error",
                relative_error,
                "(0, 1)",
            ));
        }
        let log2m = Self::suggest_log2m(relative_error);
        if log2m > u32::from(MAX_LOG2M) {
            return Err(Error::invalid_parameter(format!(
                "relative_error {relative_error} needs 2^{log2m} registers, \
                 above the 2^{MAX_LOG2M} limit"
            )));
        }
        let log2m = (log2m as u8).max(MIN_LOG2M);
        Self::with_log2m(log2m, seed)
    }

    /// Creates a sketch with exactly `2^log2m` registers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `log2m` is not in `[4, 26]`.
    pub fn with_log2m(log2m: u8, seed: u32) -> Result<Self, Error> {
        if !(MIN_LOG2M..=MAX_LOG2M).contains(&log2m) {
            return Err(Error::out_of_range(
                "log2m",
                log2m,
                &format!("[{MIN_LOG2M}, {MAX_LOG2M}]"),
            ));
        }
        Ok(HyperLogLogSketch {
            log2m,
            hashes: HashFamily::new(seed, 1),
            registers: vec![0u8; 1 << log2m],
        })
    }

    /// Suggests `log2m = ceil(2 * ln(1.04 / relative_error) / ln(2))`, before clamping.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchbench::hll::HyperLogLogSketch;
    /// assert_eq!(HyperLogLogSketch::suggest_log2m(0.1), 7);
    /// assert_eq!(HyperLogLogSketch::suggest_log2m(0.01), 14);
    /// ```
    pub fn suggest_log2m(relative_error: f64) -> u32 {
        let log2m = (2.0 * (1.04 / relative_error).ln() / std::f64::consts::LN_2).ceil();
        log2m.max(0.0) as u32
    }

    /// Records one occurrence of `item`.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) {
        let hash = self.hashes.base(item).h1();
        let index = (hash & (self.registers.len() as u64 - 1)) as usize;
        let rank = self.rank(hash);
        let register = &mut self.registers[index];
        if rank > *register {
            *register = rank;
        }
    }

    /// Returns the estimated number of distinct items added.
    pub fn cardinality(&self) -> f64 {
        estimator::estimate(&self.registers)
    }

    /// Merges `other` into this sketch by taking the register-wise maximum.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the sketches differ in register count or seed.
    pub fn merge(&mut self, other: &HyperLogLogSketch) -> Result<(), Error> {
        if self.log2m != other.log2m || self.hashes != other.hashes {
            return Err(Error::invalid_parameter(format!(
                "cannot merge HyperLogLog sketches with log2m {} / seed {} and log2m {} / seed {}",
                self.log2m,
                self.seed(),
                other.log2m,
                other.seed()
            )));
        }
        for (register, &theirs) in self.registers.iter_mut().zip(&other.registers) {
            *register = (*register).max(theirs);
        }
        Ok(())
    }

    /// Returns the packed byte footprint, `ceil(m * 6 / 8)`.
    pub fn size(&self) -> usize {
        (self.registers.len() * REGISTER_WIDTH_BITS).div_ceil(8)
    }

    /// Returns log2 of the register count.
    pub fn log2m(&self) -> u8 {
        self.log2m
    }

    /// Returns the register count (m).
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Returns the register values.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.hashes.seed()
    }

    /// Returns the expected relative standard error, `1.04 / sqrt(m)`.
    pub fn standard_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }

    /// Returns true if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Leading-zero run of the bits above the register index, plus one.
    fn rank(&self, hash: u64) -> u8 {
        let remaining = hash >> self.log2m;
        let width = 64 - u32::from(self.log2m);
        let run = if remaining == 0 {
            width
        } else {
            remaining.leading_zeros() - u32::from(self.log2m)
        };
        (run + 1) as u8
    }
}

impl<T: Hash + ?Sized> CardinalityEstimator<T> for HyperLogLogSketch {
    fn add(&mut self, item: &T) {
        HyperLogLogSketch::add(self, item);
    }

    fn cardinality(&self) -> f64 {
        HyperLogLogSketch::cardinality(self)
    }

    fn size(&self) -> usize {
        HyperLogLogSketch::size(self)
    }
}
