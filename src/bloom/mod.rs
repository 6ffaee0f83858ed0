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

//! Bloom filter for approximate set membership.
//!
//! A Bloom filter answers "possibly in set" or "definitely not in set". Inserted items are always
//! reported as present; items never inserted are reported as present with a probability that
//! approaches `(1 - e^(-k*n/m))^k` after `n` insertions into `m` bits with `k` hash functions.
//!
//! The filter is sized once from the expected number of insertions and the target false positive
//! probability, and never grows.
//!
//! # Usage
//!
//! ```rust
//! use sketchbench::bloom::BloomSketch;
//!
//! let mut filter = BloomSketch::new(1000, 0.01).unwrap();
//! filter.add("apple");
//! filter.add("banana");
//!
//! assert!(filter.contains("apple"));
//! assert_eq!(filter.num_hashes(), 7);
//! assert_eq!(filter.size(), filter.num_bits().div_ceil(8) as usize);
//! ```

mod sketch;

pub use self::sketch::BloomSketch;
