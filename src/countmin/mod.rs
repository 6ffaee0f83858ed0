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

//! Count-Min sketch for frequency estimation and heavy hitters.
//!
//! The Count-Min sketch keeps a `depth x width` table of counters. Each update adds its weight to
//! one counter per row, and a query returns the smallest of the item's counters. Collisions can
//! only add to a counter, so the estimate never falls below the true frequency; with
//! `width = ceil(e / epsilon)` and `depth = ceil(ln(1 / delta))` it exceeds the true frequency by
//! more than `epsilon * total_weight` with probability at most `delta`.
//!
//! A sketch can additionally track a bounded set of heavy hitters: the items with the largest
//! estimates seen so far.
//!
//! # Usage
//!
//! ```rust
//! use sketchbench::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(5, 256, 12345).unwrap();
//!
//! sketch.increment(&"apple");
//! sketch.increment_by(&"banana", 3);
//!
//! let banana = sketch.estimate("banana");
//! assert!(banana >= 3);
//! assert!(sketch.upper_bound("banana") >= banana);
//! ```
//!
//! # Heavy Hitters
//!
//! ```rust
//! use sketchbench::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::with_accuracy(0.01, 0.01, 1)
//!     .unwrap()
//!     .with_heavy_hitters(2);
//!
//! for (item, times) in [("a", 10), ("b", 1), ("c", 5)] {
//!     sketch.increment_by(&item, times);
//! }
//!
//! let top: Vec<_> = sketch.top_k(2).into_iter().map(|(item, _)| item).collect();
//! assert_eq!(top, vec!["a", "c"]);
//! ```

mod sketch;
mod top_k;

pub use self::sketch::CountMinSketch;
