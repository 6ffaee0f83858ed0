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

//! Preset scenario grids.

use super::scenario::CardinalityScenario;
use super::scenario::FrequencyScenario;
use super::scenario::MembershipScenario;
use super::scenario::Scenario;
use crate::hash::DEFAULT_SEED;

/// Fill rates of the membership grid.
pub const FILL_RATES: [f64; 5] = [0.01, 0.05, 0.1, 0.2, 0.5];

/// `(cardinality, depth, width, repetitions)` of the frequency grid.
pub const FREQUENCY_GRID: [(usize, u32, u32, u32); 5] = [
    (1_000, 5, 350, 8),
    (10_000, 4, 2_000, 5),
    (100_000, 3, 9_000, 4),
    (1_000_000, 3, 32_000, 3),
    (10_000_000, 3, 111_000, 3),
];

/// Repetitions of every cardinality in the cardinality grid, one generator seed each.
pub const CARDINALITY_REPETITIONS: u64 = 5;

const MIN_CARDINALITY: usize = 1_000;
const DEFAULT_MAX_CARDINALITY: usize = 1_000_000;
const DEFAULT_FPPS: [f64; 4] = [0.1, 0.05, 0.03, 0.01];
const DEFAULT_ERRORS: [f64; 3] = [0.1, 0.05, 0.01];

fn cardinalities(max_cardinality: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(MIN_CARDINALITY), |c| c.checked_mul(10))
        .take_while(move |&c| c <= max_cardinality)
}

/// Membership scenarios for test cardinalities 1000, 10000, ... up to `max_cardinality`, each at
/// every fill rate of [`FILL_RATES`].
pub fn membership_plan(max_cardinality: usize, fpp: f64) -> Vec<Scenario> {
    cardinalities(max_cardinality)
        .flat_map(|cardinality| {
            FILL_RATES
                .iter()
                .map(move |&fill_rate| MembershipScenario::new(cardinality, fill_rate, fpp).into())
        })
        .collect()
}

/// Frequency scenarios of [`FREQUENCY_GRID`], every repetition with its own sketch seed.
pub fn frequency_plan() -> Vec<Scenario> {
    FREQUENCY_GRID
        .iter()
        .flat_map(|&(cardinality, depth, width, repetitions)| {
            (0..repetitions).map(move |rep| {
                let mut scenario = FrequencyScenario::new(cardinality, depth, width);
                scenario.sketch_seed = DEFAULT_SEED + rep;
                scenario.into()
            })
        })
        .collect()
}

/// Cardinality scenarios for cardinalities 1000, 10000, ... up to `max_cardinality`, repeated with
/// generator seeds `0..CARDINALITY_REPETITIONS`.
pub fn cardinality_plan(max_cardinality: usize, relative_error: f64) -> Vec<Scenario> {
    cardinalities(max_cardinality)
        .flat_map(|cardinality| {
            (0..CARDINALITY_REPETITIONS)
                .map(move |seed| CardinalityScenario::new(cardinality, relative_error, seed).into())
        })
        .collect()
}

/// The full benchmark: membership at several false positive rates, the frequency grid, and
/// cardinality at several relative errors.
pub fn default_plan() -> Vec<Scenario> {
    let mut plan = Vec::new();
    for fpp in DEFAULT_FPPS {
        plan.extend(membership_plan(DEFAULT_MAX_CARDINALITY, fpp));
    }
    plan.extend(frequency_plan());
    for error in DEFAULT_ERRORS {
        plan.extend(cardinality_plan(DEFAULT_MAX_CARDINALITY, error));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_plan() {
        let plan = membership_plan(10_000, 0.05);
        assert_eq!(plan.len(), 10);
        let Scenario::Membership(last) = &plan[9] else {
            panic!("unexpected scenario {:?}", plan[9]);
        };
        assert_eq!(last.test_cardinality, 10_000);
        assert_eq!(last.fill_rate, 0.5);
        assert_eq!(last.stream_length, 50_000);
        assert_eq!(last.generator_seed, 12345);

        assert!(membership_plan(999, 0.05).is_empty());
    }

    #[test]
    fn test_frequency_plan() {
        let plan = frequency_plan();
        assert_eq!(plan.len(), 8 + 5 + 4 + 3 + 3);
        let Scenario::Frequency(second) = &plan[1] else {
            panic!("unexpected scenario {:?}", plan[1]);
        };
        assert_eq!((second.depth, second.width), (5, 350));
        assert_eq!(second.sketch_seed, DEFAULT_SEED + 1);
        assert_eq!(second.generator_seed, 1_000);
    }

    #[test]
    fn test_cardinality_plan() {
        let plan = cardinality_plan(100_000, 0.01);
        assert_eq!(plan.len(), 15);
        assert!(plan.iter().all(|s| s.family() == "cardinality"));
    }

    #[test]
    fn test_default_plan() {
        let plan = default_plan();
        assert_eq!(plan.len(), 4 * 20 + 23 + 3 * 20);
    }
}
