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

use super::scenario::Scenario;
use crate::stream::Key;

/// Outcome of a membership comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipMetrics {
    /// Number of membership queries issued.
    pub tests: u64,
    /// Queries for stored keys, all of which the sketch answered positively.
    pub true_positives: u64,
    /// Queries for keys never stored that the sketch answered positively.
    pub false_positives: u64,
}

impl MembershipMetrics {
    /// Queries for keys never stored.
    pub fn negatives(&self) -> u64 {
        self.tests - self.true_positives
    }

    /// Observed false positive rate among queries for keys never stored.
    pub fn false_positive_rate(&self) -> f64 {
        match self.negatives() {
            0 => 0.0,
            negatives => self.false_positives as f64 / negatives as f64,
        }
    }

    /// False positives as a share of all queries, members included.
    pub fn false_positive_share(&self) -> f64 {
        match self.tests {
            0 => 0.0,
            tests => self.false_positives as f64 / tests as f64,
        }
    }
}

/// Outcome of a frequency comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMetrics {
    /// Distinct keys in the stream.
    pub true_cardinality: usize,
    /// Most frequent key of the stream, if the stream was not empty.
    pub top1: Option<Key>,
    /// Exact count of the most frequent key.
    pub top1_true: u64,
    /// Sketch estimate of the most frequent key.
    pub top1_estimate: u64,
    /// Whether the most frequent key has the (or a tied) highest estimate among all keys.
    pub top1_detected: bool,
    /// `Σ|true − estimate| / Σ true` over the exact top keys.
    pub top_error: f64,
    /// Fraction of the exact top keys found in the sketch's heavy-hitter tracker, `None` when the
    /// sketch tracks no heavy hitters.
    pub heavy_hitter_recall: Option<f64>,
}

/// Outcome of a cardinality comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardinalityMetrics {
    /// Exact number of distinct keys.
    pub true_cardinality: u64,
    /// Sketch estimate.
    pub estimated_cardinality: f64,
}

impl CardinalityMetrics {
    /// Returns `|estimate − true| / true`, or the absolute estimate when nothing was counted.
    pub fn relative_error(&self) -> f64 {
        let diff = (self.estimated_cardinality - self.true_cardinality as f64).abs();
        if self.true_cardinality == 0 {
            diff
        } else {
            diff / self.true_cardinality as f64
        }
    }
}

/// The family-specific part of a [`MetricsRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Bloom sketch against an exact set.
    Membership(MembershipMetrics),
    /// Count-Min sketch against exact frequencies.
    Frequency(FrequencyMetrics),
    /// HyperLogLog sketch against an exact set.
    Cardinality(CardinalityMetrics),
}

/// The result of one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    /// The scenario that produced this record.
    pub scenario: Scenario,
    /// Byte footprint of the sketch after the run.
    pub sketch_size: usize,
    /// Byte footprint of the exact baseline after the run.
    pub baseline_size: usize,
    /// Accuracy figures.
    pub measurement: Measurement,
}

impl MetricsRecord {
    /// Sketch footprint relative to the baseline footprint.
    pub fn size_ratio(&self) -> f64 {
        self.sketch_size as f64 / self.baseline_size as f64
    }
}
