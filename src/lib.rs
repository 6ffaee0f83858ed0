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

//! # sketchbench
//!
//! Measures the accuracy and footprint of three probabilistic streaming sketches against exact
//! ground truth, over reproducible synthetic key streams:
//!
//! - [`bloom::BloomSketch`] answers approximate set membership,
//! - [`countmin::CountMinSketch`] estimates frequencies and tracks heavy hitters,
//! - [`hll::HyperLogLogSketch`] estimates the number of distinct keys.
//!
//! Every sketch implements one of the narrow contracts in [`estimator`], shared with the exact
//! structures in [`exact`]. [`stream::StreamGenerator`] derives uniform and Zipfian key streams
//! from a seed, and [`bench::BenchmarkRunner`] drives a sketch and its baseline through the same
//! stream to produce a [`bench::MetricsRecord`].
//!
//! The library installs no `tracing` subscriber; the runner's scenario logs go wherever the
//! caller's subscriber sends them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bench;
pub mod bloom;
pub mod common;
pub mod countmin;
pub mod error;
pub mod estimator;
pub mod exact;
pub mod hash;
pub mod hll;
pub mod stream;
