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

use proptest::prelude::*;
use sketchbench::bloom::BloomSketch;
use sketchbench::countmin::CountMinSketch;
use sketchbench::exact::ExactFrequencies;
use sketchbench::exact::ExactSet;
use sketchbench::hll::HyperLogLogSketch;

proptest! {
    #[test]
    fn bloom_has_no_false_negatives(
        items in prop::collection::vec(any::<u64>(), 1..500),
        seed in any::<u32>(),
    ) {
        let mut sketch = BloomSketch::with_seed(items.len() as u64, 0.01, seed).unwrap();
        let size = sketch.size();
        for item in &items {
            sketch.add(item);
        }
        for item in &items {
            prop_assert!(sketch.contains(item));
        }
        prop_assert_eq!(sketch.size(), size);
    }

    #[test]
    fn countmin_never_underestimates(
        items in prop::collection::vec((0u16..200, 1u64..20), 1..500),
        depth in 1u32..6,
        width in 1u32..64,
        seed in any::<u32>(),
    ) {
        let mut sketch = CountMinSketch::new(depth, width, seed).unwrap();
        let mut exact = ExactFrequencies::new();
        for (item, delta) in &items {
            sketch.increment_by(item, *delta);
            exact.increment_by(item, *delta);
        }
        prop_assert_eq!(sketch.total_weight(), exact.total_weight());
        for (item, count) in exact.iter() {
            prop_assert!(sketch.estimate(item) >= count);
        }
        prop_assert_eq!(sketch.size(), sketch.size());
    }

    #[test]
    fn countmin_counters_never_decrease(
        items in prop::collection::vec(any::<u32>(), 1..200),
        seed in any::<u32>(),
    ) {
        let mut sketch = CountMinSketch::new(3, 16, seed).unwrap();
        let mut previous: Vec<u64> = (0..3).flat_map(|r| sketch.row(r).to_vec()).collect();
        for item in &items {
            sketch.increment(item);
            let current: Vec<u64> = (0..3).flat_map(|r| sketch.row(r).to_vec()).collect();
            prop_assert!(previous.iter().zip(&current).all(|(p, c)| p <= c));
            previous = current;
        }
    }

    #[test]
    fn hll_registers_never_decrease(
        items in prop::collection::vec(any::<String>(), 1..300),
        log2m in 4u8..12,
    ) {
        let mut sketch = HyperLogLogSketch::with_log2m(log2m, 0).unwrap();
        let mut previous = sketch.registers().to_vec();
        for item in &items {
            sketch.add(item);
            let current = sketch.registers();
            prop_assert!(previous.iter().zip(current).all(|(p, c)| p <= c));
            previous = current.to_vec();
        }
        prop_assert_eq!(sketch.cardinality(), sketch.cardinality());
        prop_assert_eq!(sketch.size(), sketch.size());
    }

    #[test]
    fn exact_set_size_is_monotone(items in prop::collection::vec(any::<u64>(), 0..200)) {
        let mut set = ExactSet::new();
        let mut previous = set.size();
        for item in &items {
            set.insert(item);
            prop_assert!(set.size() >= previous);
            previous = set.size();
        }
    }

    #[test]
    fn exact_top_k_is_sorted(items in prop::collection::vec(0u8..20, 0..300), n in 0usize..25) {
        let mut exact = ExactFrequencies::new();
        for item in &items {
            exact.increment(item);
        }
        let top = exact.top_k(n);
        prop_assert_eq!(top.len(), n.min(exact.len()));
        for pair in top.windows(2) {
            let ((a, a_count), (b, b_count)) = (&pair[0], &pair[1]);
            prop_assert!(a_count > b_count || (a_count == b_count && a < b));
        }
    }
}
