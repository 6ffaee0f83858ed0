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

//! Lockstep comparisons of a sketch against its exact baseline.
//!
//! Each function is generic over the estimator contract of its family, so any implementation can
//! be measured with the same protocol the runner uses.

use super::metrics::CardinalityMetrics;
use super::metrics::FrequencyMetrics;
use super::metrics::MembershipMetrics;
use crate::error::Error;
use crate::estimator::CardinalityEstimator;
use crate::estimator::FrequencyEstimator;
use crate::estimator::MembershipEstimator;
use crate::exact::ExactFrequencies;
use crate::stream::Key;

/// Stores `stored` in both structures, then queries both with `queries`.
///
/// # Errors
///
/// Returns [`InvariantViolation`](crate::error::ErrorKind::InvariantViolation) on the first key
/// the baseline holds but the sketch rejects.
pub fn compare_membership<S, B>(
    sketch: &mut S,
    baseline: &mut B,
    stored: impl IntoIterator<Item = Key>,
    queries: impl IntoIterator<Item = Key>,
) -> Result<MembershipMetrics, Error>
where
    S: MembershipEstimator<Key> + ?Sized,
    B: MembershipEstimator<Key> + ?Sized,
{
    for key in stored {
        sketch.add(&key);
        baseline.add(&key);
    }

    let mut metrics = MembershipMetrics {
        tests: 0,
        true_positives: 0,
        false_positives: 0,
    };
    for key in queries {
        metrics.tests += 1;
        match (baseline.contains(&key), sketch.contains(&key)) {
            (true, true) => metrics.true_positives += 1,
            (false, true) => metrics.false_positives += 1,
            (false, false) => {}
            (true, false) => {
                return Err(Error::invariant_violation("sketch rejected a stored key")
                    .with_context("key", key));
            }
        }
    }
    Ok(metrics)
}

/// Counts `stream` in both structures and measures the sketch on the baseline's `top_k` keys.
///
/// # Errors
///
/// Returns [`InvariantViolation`](crate::error::ErrorKind::InvariantViolation) if the sketch
/// estimates any top key below its exact count.
pub fn compare_frequency<S>(
    sketch: &mut S,
    baseline: &mut ExactFrequencies<Key>,
    stream: impl IntoIterator<Item = Key>,
    top_k: usize,
) -> Result<FrequencyMetrics, Error>
where
    S: FrequencyEstimator<Key> + ?Sized,
{
    for key in stream {
        sketch.increment(&key);
        baseline.increment(&key);
    }

    let top = baseline.top_k(top_k);
    let mut true_sum = 0u64;
    let mut error_sum = 0u64;
    for (key, count) in &top {
        let estimate = sketch.estimate(key);
        if estimate < *count {
            return Err(Error::invariant_violation("sketch underestimated a frequency")
                .with_context("key", key)
                .with_context("count", count)
                .with_context("estimate", estimate));
        }
        true_sum += count;
        error_sum += estimate - count;
    }
    let top_error = match true_sum {
        0 => 0.0,
        sum => error_sum as f64 / sum as f64,
    };

    let (top1, top1_true, top1_estimate, top1_detected) = match top.first() {
        Some((key, count)) => {
            let estimate = sketch.estimate(key);
            let highest = baseline
                .iter()
                .map(|(other, _)| sketch.estimate(other))
                .max()
                .unwrap_or(0);
            (Some(key.clone()), *count, estimate, estimate >= highest)
        }
        None => (None, 0, 0, false),
    };

    Ok(FrequencyMetrics {
        true_cardinality: baseline.len(),
        top1,
        top1_true,
        top1_estimate,
        top1_detected,
        top_error,
        heavy_hitter_recall: None,
    })
}

/// Feeds `stream` to both structures and reads both cardinalities.
pub fn compare_cardinality<S, B>(
    sketch: &mut S,
    baseline: &mut B,
    stream: impl IntoIterator<Item = Key>,
) -> CardinalityMetrics
where
    S: CardinalityEstimator<Key> + ?Sized,
    B: CardinalityEstimator<Key> + ?Sized,
{
    for key in stream {
        sketch.add(&key);
        baseline.add(&key);
    }
    CardinalityMetrics {
        true_cardinality: baseline.cardinality() as u64,
        estimated_cardinality: sketch.cardinality(),
    }
}

/// Fraction of `expected` found in `tracked`.
pub(crate) fn recall(expected: &[(Key, u64)], tracked: &[(Key, u64)]) -> f64 {
    if expected.is_empty() {
        return 1.0;
    }
    let found = expected
        .iter()
        .filter(|(key, _)| tracked.iter().any(|(other, _)| other == key))
        .count();
    found as f64 / expected.len() as f64
}
