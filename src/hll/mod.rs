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

//! HyperLogLog sketch for approximate distinct counting.
//!
//! The sketch keeps `m = 2^log2m` small registers. Each item is hashed once: the low `log2m`
//! bits pick a register and the position of the first set bit in the remaining bits becomes a
//! candidate value; the register keeps the maximum candidate it has seen. The cardinality is
//! read back through the bias-corrected harmonic mean of `2^-register`, falling back to linear
//! counting while many registers are still empty.
//!
//! The relative standard error is about `1.04 / sqrt(m)`; constructing from a target error picks
//! `log2m = ceil(2 * ln(1.04 / error) / ln(2))`.
//!
//! # Usage
//!
//! ```rust
//! use sketchbench::hll::HyperLogLogSketch;
//!
//! let mut sketch = HyperLogLogSketch::new(0.05).unwrap();
//! assert_eq!(sketch.log2m(), 9);
//!
//! for i in 0..10_000u64 {
//!     sketch.add(&i);
//! }
//!
//! let estimate = sketch.cardinality();
//! assert!((estimate - 10_000.0).abs() < 10_000.0 * 0.2);
//! ```

mod estimator;
mod sketch;

pub use self::sketch::HyperLogLogSketch;
