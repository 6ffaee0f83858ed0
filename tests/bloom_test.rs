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

mod common;

use common::collect_stream;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use sketchbench::bloom::BloomSketch;
use sketchbench::error::ErrorKind;
use sketchbench::estimator::MembershipEstimator;
use sketchbench::stream::Distribution;
use sketchbench::stream::Key;
use sketchbench::stream::StreamGenerator;

const FPP: f64 = 0.05;
const MEMBERS: usize = 1_000;
const NON_MEMBERS: usize = 9_000;

#[test]
fn test_false_positive_rate_is_bounded() {
    for seed in [1u32, 7, 42, 9001] {
        let generator = StreamGenerator::new(u64::from(seed), MEMBERS + NON_MEMBERS);
        let mut sketch = BloomSketch::with_seed(MEMBERS as u64, FPP, seed).unwrap();

        for key in generator.keys(MEMBERS) {
            sketch.add(&key);
        }
        for key in generator.keys(MEMBERS) {
            assert!(sketch.contains(&key), "false negative for {key}");
        }

        let false_positives = generator
            .keys(MEMBERS + NON_MEMBERS)
            .skip(MEMBERS)
            .filter(|key| sketch.contains(key))
            .count();
        let rate = false_positives as f64 / NON_MEMBERS as f64;
        assert_that!(rate, ge(FPP / 3.0));
        assert_that!(rate, le(3.0 * FPP));
    }
}

#[test]
fn test_no_false_negatives_over_stream() {
    let generator = StreamGenerator::new(12345, 5_000);
    let stream = collect_stream(&generator, Distribution::Uniform, 500, 2_500);

    let mut sketch = BloomSketch::new(500, 0.01).unwrap();
    for key in &stream {
        MembershipEstimator::add(&mut sketch, key);
    }
    assert!(stream.iter().all(|key| sketch.contains(key)));
}

#[test]
fn test_key_and_str_agree() {
    let mut sketch = BloomSketch::new(100, 0.01).unwrap();
    sketch.add(&Key::from("-42"));
    assert!(sketch.contains("-42"));
    sketch.add("17");
    assert!(sketch.contains(&Key::from("17")));
}

#[test]
fn test_dimensions() {
    let sketch = BloomSketch::new(1_000, FPP).unwrap();
    assert_eq!(sketch.num_bits(), 6_236);
    assert_eq!(sketch.num_hashes(), 4);
    assert_eq!(sketch.size(), 780);
    assert_eq!(sketch.size(), sketch.size());
}

#[test]
fn test_load_factor_grows() {
    let mut sketch = BloomSketch::new(1_000, 0.01).unwrap();
    assert!(sketch.is_empty());
    assert_eq!(sketch.load_factor(), 0.0);

    for i in 0..500u64 {
        sketch.add(&i);
    }
    let half = sketch.load_factor();
    for i in 500..1_000u64 {
        sketch.add(&i);
    }
    let full = sketch.load_factor();
    assert!(half > 0.0 && half < full && full < 1.0);
    assert!(sketch.estimated_fpp() < 0.05);
}

#[test]
fn test_invalid_parameters() {
    for (n, p) in [(0, 0.1), (10, 0.0), (10, 1.0), (10, -0.5), (10, f64::NAN)] {
        let err = BloomSketch::new(n, p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "n={n}, p={p}");
    }
    assert!(BloomSketch::with_size(0, 3, 0).is_err());
    assert!(BloomSketch::with_size(64, 0, 0).is_err());
}
