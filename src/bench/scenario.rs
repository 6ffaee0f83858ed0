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

use std::fmt;

use crate::hash::DEFAULT_SEED;

/// Generator seed used by the membership presets.
pub const MEMBERSHIP_GENERATOR_SEED: u64 = 12345;

/// A membership comparison between a Bloom sketch and an exact set.
///
/// A uniform stream over the first `fill_rate * test_cardinality` keys of the universe is stored;
/// a uniform stream over all `test_cardinality` keys is then queried against both structures.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipScenario {
    /// Number of distinct keys in the query universe.
    pub test_cardinality: usize,
    /// Fraction of the query universe that is stored, in `(0, 1]`.
    pub fill_rate: f64,
    /// Target false positive probability of the sketch.
    pub fpp: f64,
    /// Length of both the store stream and the query stream.
    pub stream_length: u64,
    /// Seed of the stream generator.
    pub generator_seed: u64,
    /// Seed of the sketch's hash family.
    pub sketch_seed: u32,
}

impl MembershipScenario {
    /// Creates a scenario with a stream five times the test cardinality.
    pub fn new(test_cardinality: usize, fill_rate: f64, fpp: f64) -> Self {
        MembershipScenario {
            test_cardinality,
            fill_rate,
            fpp,
            stream_length: 5 * test_cardinality as u64,
            generator_seed: MEMBERSHIP_GENERATOR_SEED,
            sketch_seed: DEFAULT_SEED,
        }
    }

    /// Number of distinct keys the store stream draws from.
    pub fn stored_cardinality(&self) -> usize {
        let stored = (self.fill_rate * self.test_cardinality as f64).round() as usize;
        stored.clamp(1, self.test_cardinality.max(1))
    }
}

/// A frequency comparison between a Count-Min sketch and an exact frequency map over a Zipfian
/// stream.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyScenario {
    /// Number of distinct keys the stream draws from.
    pub cardinality: usize,
    /// Zipf exponent of the stream.
    pub exponent: f64,
    /// Number of keys in the stream.
    pub stream_length: u64,
    /// Rows of the sketch.
    pub depth: u32,
    /// Columns of the sketch.
    pub width: u32,
    /// Capacity of the sketch's heavy-hitter tracker, also the size of the measured top.
    pub top_k: usize,
    /// Seed of the stream generator.
    pub generator_seed: u64,
    /// Seed of the sketch's hash family.
    pub sketch_seed: u32,
}

impl FrequencyScenario {
    /// Creates a scenario over a Zipf(0.5) stream ten times the cardinality, tracking the top 10.
    ///
    /// The generator is seeded with the cardinality.
    pub fn new(cardinality: usize, depth: u32, width: u32) -> Self {
        FrequencyScenario {
            cardinality,
            exponent: 0.5,
            stream_length: 10 * cardinality as u64,
            depth,
            width,
            top_k: 10,
            generator_seed: cardinality as u64,
            sketch_seed: DEFAULT_SEED,
        }
    }
}

/// A cardinality comparison between a HyperLogLog sketch and an exact set over a uniform stream.
#[derive(Debug, Clone, PartialEq)]
pub struct CardinalityScenario {
    /// Number of distinct keys the stream draws from.
    pub cardinality: usize,
    /// Target relative standard error of the sketch.
    pub relative_error: f64,
    /// Number of keys in the stream.
    pub stream_length: u64,
    /// Seed of the stream generator.
    pub generator_seed: u64,
    /// Seed of the sketch's hash family.
    pub sketch_seed: u32,
}

impl CardinalityScenario {
    /// Creates a scenario with a stream ten times the cardinality.
    pub fn new(cardinality: usize, relative_error: f64, generator_seed: u64) -> Self {
        CardinalityScenario {
            cardinality,
            relative_error,
            stream_length: 10 * cardinality as u64,
            generator_seed,
            sketch_seed: DEFAULT_SEED,
        }
    }
}

/// One benchmark scenario of any sketch family.
#[derive(Debug, Clone, PartialEq)]
pub enum Scenario {
    /// Bloom sketch against an exact set.
    Membership(MembershipScenario),
    /// Count-Min sketch against exact frequencies.
    Frequency(FrequencyScenario),
    /// HyperLogLog sketch against an exact set.
    Cardinality(CardinalityScenario),
}

impl Scenario {
    /// Name of the sketch family under test.
    pub fn family(&self) -> &'static str {
        match self {
            Scenario::Membership(_) => "membership",
            Scenario::Frequency(_) => "frequency",
            Scenario::Cardinality(_) => "cardinality",
        }
    }

    /// Length of the stream driving the scenario.
    pub fn stream_length(&self) -> u64 {
        match self {
            Scenario::Membership(s) => s.stream_length,
            Scenario::Frequency(s) => s.stream_length,
            Scenario::Cardinality(s) => s.stream_length,
        }
    }
}

impl From<MembershipScenario> for Scenario {
    fn from(scenario: MembershipScenario) -> Self {
        Scenario::Membership(scenario)
    }
}

impl From<FrequencyScenario> for Scenario {
    fn from(scenario: FrequencyScenario) -> Self {
        Scenario::Frequency(scenario)
    }
}

impl From<CardinalityScenario> for Scenario {
    fn from(scenario: CardinalityScenario) -> Self {
        Scenario::Cardinality(scenario)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Membership(s) => write!(
                f,
                "membership(cardinality={}, fill_rate={}, fpp={}, seed={}, sketch_seed={})",
                s.test_cardinality, s.fill_rate, s.fpp, s.generator_seed, s.sketch_seed
            ),
            Scenario::Frequency(s) => write!(
                f,
                "frequency(cardinality={}, exponent={}, depth={}, width={}, seed={}, \
                 sketch_seed={})",
                s.cardinality, s.exponent, s.depth, s.width, s.generator_seed, s.sketch_seed
            ),
            Scenario::Cardinality(s) => write!(
                f,
                "cardinality(cardinality={}, error={}, seed={}, sketch_seed={})",
                s.cardinality, s.relative_error, s.generator_seed, s.sketch_seed
            ),
        }
    }
}
