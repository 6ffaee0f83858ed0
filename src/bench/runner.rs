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

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use super::compare::compare_cardinality;
use super::compare::compare_frequency;
use super::compare::compare_membership;
use super::compare::recall;
use super::metrics::Measurement;
use super::metrics::MetricsRecord;
use super::scenario::CardinalityScenario;
use super::scenario::FrequencyScenario;
use super::scenario::MembershipScenario;
use super::scenario::Scenario;
use crate::bloom::BloomSketch;
use crate::countmin::CountMinSketch;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::ScenarioError;
use crate::estimator::CardinalityEstimator;
use crate::estimator::FrequencyEstimator;
use crate::estimator::MembershipEstimator;
use crate::exact::ExactFrequencies;
use crate::exact::ExactSet;
use crate::hll::HyperLogLogSketch;
use crate::stream::Distribution;
use crate::stream::Key;
use crate::stream::StreamGenerator;

/// A scenario rejected with an invalid parameter.
#[derive(Debug)]
pub struct ScenarioFailure {
    /// The rejected scenario.
    pub scenario: Scenario,
    /// Why it was rejected.
    pub error: ScenarioError,
}

/// Records and failures of a batch of scenarios, in scenario order.
#[derive(Debug, Default)]
pub struct RunReport {
    records: Vec<MetricsRecord>,
    failures: Vec<ScenarioFailure>,
}

impl RunReport {
    /// Records of the scenarios that completed.
    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    /// Scenarios rejected with an invalid parameter.
    pub fn failures(&self) -> &[ScenarioFailure] {
        &self.failures
    }

    /// Returns true if every scenario completed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(
        &mut self,
        scenario: &Scenario,
        result: Result<MetricsRecord, ScenarioError>,
    ) -> Result<(), Error> {
        match result {
            Ok(record) => self.records.push(record),
            Err(error) if error.kind() == ErrorKind::InvalidParameter => {
                self.failures.push(ScenarioFailure {
                    scenario: scenario.clone(),
                    error,
                });
            }
            Err(error) => return Err(error.with_context("completed", self.records.len())),
        }
        Ok(())
    }
}

/// Drives scenarios through generate, populate, compare and emit.
///
/// # Examples
///
/// ```
/// use sketchbench::bench::BenchmarkRunner;
/// use sketchbench::bench::CardinalityScenario;
/// use sketchbench::bench::Measurement;
///
/// let scenario = CardinalityScenario::new(1000, 0.05, 0).into();
/// let record = BenchmarkRunner::new().run(&scenario).unwrap();
/// let Measurement::Cardinality(metrics) = record.measurement else {
///     unreachable!()
/// };
/// assert_eq!(metrics.true_cardinality, 1000);
/// assert!(metrics.relative_error() < 0.2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkRunner {
    threads: usize,
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkRunner {
    /// Creates a runner that executes scenarios one after another.
    pub fn new() -> Self {
        BenchmarkRunner { threads: 1 }
    }

    /// Creates a runner that executes independent scenarios on up to `threads` threads.
    pub fn with_threads(threads: usize) -> Self {
        BenchmarkRunner {
            threads: threads.max(1),
        }
    }

    /// Returns the number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Runs one scenario.
    ///
    /// # Errors
    ///
    /// Returns the failure with the scenario attached as `scenario` context:
    /// [`InvalidParameter`](ErrorKind::InvalidParameter) if a sketch or stream rejects the
    /// scenario's parameters, [`InvariantViolation`](ErrorKind::InvariantViolation) if a sketch
    /// breaks its error guarantee.
    pub fn run(&self, scenario: &Scenario) -> Result<MetricsRecord, ScenarioError> {
        tracing::info!(
            family = scenario.family(),
            stream_length = scenario.stream_length(),
            "scenario started: {scenario}"
        );

        let result = match scenario {
            Scenario::Membership(s) => run_membership(s),
            Scenario::Frequency(s) => run_frequency(s),
            Scenario::Cardinality(s) => run_cardinality(s),
        };

        match result {
            Ok(record) => {
                tracing::info!(
                    family = scenario.family(),
                    sketch_size = record.sketch_size,
                    baseline_size = record.baseline_size,
                    "scenario finished: {scenario}"
                );
                Ok(record)
            }
            Err(err) => {
                let err = err.with_context("scenario", scenario);
                match err.kind() {
                    ErrorKind::InvalidParameter => tracing::warn!("scenario rejected: {err}"),
                    _ => tracing::error!("scenario failed: {err}"),
                }
                Err(err)
            }
        }
    }

    /// Runs every scenario and collects the outcomes in scenario order.
    ///
    /// Scenarios rejected with an invalid parameter are reported and skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first [`InvariantViolation`](ErrorKind::InvariantViolation) and returns it,
    /// with the number of records completed before it as `completed` context. With several
    /// threads, scenarios already running when it is detected still finish.
    pub fn run_all(&self, scenarios: &[Scenario]) -> Result<RunReport, Error> {
        self.run_all_with(scenarios, |scenario| self.run(scenario))
    }

    /// Like [`run_all`](Self::run_all), executing each scenario with `run`.
    pub(crate) fn run_all_with<F>(
        &self,
        scenarios: &[Scenario],
        run: F,
    ) -> Result<RunReport, Error>
    where
        F: Fn(&Scenario) -> Result<MetricsRecord, ScenarioError> + Sync,
    {
        tracing::info!(
            scenarios = scenarios.len(),
            threads = self.threads,
            "benchmark run started"
        );

        let report = if self.threads == 1 || scenarios.len() <= 1 {
            run_sequential(scenarios, &run)?
        } else {
            self.run_parallel(scenarios, &run)?
        };

        tracing::info!(
            records = report.records.len(),
            failures = report.failures.len(),
            "benchmark run finished"
        );
        Ok(report)
    }

    fn run_parallel<F>(&self, scenarios: &[Scenario], run: &F) -> Result<RunReport, Error>
    where
        F: Fn(&Scenario) -> Result<MetricsRecord, ScenarioError> + Sync,
    {
        let next = AtomicUsize::new(0);
        let halted = AtomicBool::new(false);
        let outcomes = Mutex::new(Vec::with_capacity(scenarios.len()));

        std::thread::scope(|scope| {
            for _ in 0..self.threads.min(scenarios.len()) {
                scope.spawn(|| {
                    while !halted.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(scenario) = scenarios.get(index) else {
                            break;
                        };
                        let result = run(scenario);
                        if let Err(err) = &result {
                            if err.kind() == ErrorKind::InvariantViolation {
                                halted.store(true, Ordering::Relaxed);
                            }
                        }
                        outcomes
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push((index, result));
                    }
                });
            }
        });

        // Indexes are claimed in order, so every scenario before a violation has an outcome.
        let mut outcomes = outcomes.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcomes.sort_by_key(|(index, _)| *index);

        let mut report = RunReport::default();
        for (index, result) in outcomes {
            report.absorb(&scenarios[index], result)?;
        }
        Ok(report)
    }
}

fn run_sequential<F>(scenarios: &[Scenario], run: &F) -> Result<RunReport, Error>
where
    F: Fn(&Scenario) -> Result<MetricsRecord, ScenarioError>,
{
    let mut report = RunReport::default();
    for scenario in scenarios {
        report.absorb(scenario, run(scenario))?;
    }
    Ok(report)
}

fn run_membership(scenario: &MembershipScenario) -> Result<MetricsRecord, Error> {
    if scenario.test_cardinality == 0 {
        return Err(Error::invalid_parameter("test cardinality must be positive"));
    }
    if !(scenario.fill_rate > 0.0 && scenario.fill_rate <= 1.0) {
        return Err(Error::out_of_range("fill rate", scenario.fill_rate, "(0, 1]"));
    }
    let stored = scenario.stored_cardinality();
    let mut sketch = BloomSketch::with_seed(stored as u64, scenario.fpp, scenario.sketch_seed)?;
    measure_membership(scenario, &mut sketch)
}

fn run_frequency(scenario: &FrequencyScenario) -> Result<MetricsRecord, Error> {
    let mut sketch =
        CountMinSketch::<Key>::new(scenario.depth, scenario.width, scenario.sketch_seed)?
            .with_heavy_hitters(scenario.top_k);
    measure_frequency(scenario, &mut sketch, |sketch| {
        Some(sketch.top_k(scenario.top_k))
    })
}

fn run_cardinality(scenario: &CardinalityScenario) -> Result<MetricsRecord, Error> {
    let mut sketch = HyperLogLogSketch::with_seed(scenario.relative_error, scenario.sketch_seed)?;
    measure_cardinality(scenario, &mut sketch)
}

/// Drives any membership estimator through the membership protocol.
pub(crate) fn measure_membership<S>(
    scenario: &MembershipScenario,
    sketch: &mut S,
) -> Result<MetricsRecord, Error>
where
    S: MembershipEstimator<Key> + ?Sized,
{
    let stored = scenario.stored_cardinality();
    let mut baseline = ExactSet::<Key>::new();

    let generator = StreamGenerator::new(scenario.generator_seed, scenario.test_cardinality);
    let store = generator.generate(Distribution::Uniform, stored, scenario.stream_length)?;
    let queries = generator.generate(
        Distribution::Uniform,
        scenario.test_cardinality,
        scenario.stream_length,
    )?;
    let metrics = compare_membership(sketch, &mut baseline, store, queries)?;

    Ok(MetricsRecord {
        scenario: Scenario::Membership(scenario.clone()),
        sketch_size: sketch.size(),
        baseline_size: baseline.size(),
        measurement: Measurement::Membership(metrics),
    })
}

/// Drives any frequency estimator over the scenario's Zipfian stream.
///
/// `heavy_hitters` reads the sketch's tracked top keys, if it tracks any.
pub(crate) fn measure_frequency<S>(
    scenario: &FrequencyScenario,
    sketch: &mut S,
    heavy_hitters: impl FnOnce(&S) -> Option<Vec<(Key, u64)>>,
) -> Result<MetricsRecord, Error>
where
    S: FrequencyEstimator<Key>,
{
    let mut baseline = ExactFrequencies::new();

    let generator = StreamGenerator::new(scenario.generator_seed, scenario.cardinality);
    let stream = generator.generate(
        Distribution::Zipfian {
            exponent: scenario.exponent,
        },
        scenario.cardinality,
        scenario.stream_length,
    )?;
    let mut metrics = compare_frequency(sketch, &mut baseline, stream, scenario.top_k)?;
    metrics.heavy_hitter_recall = heavy_hitters(sketch)
        .map(|tracked| recall(&baseline.top_k(scenario.top_k), &tracked));

    Ok(MetricsRecord {
        scenario: Scenario::Frequency(scenario.clone()),
        sketch_size: sketch.size(),
        baseline_size: baseline.size(),
        measurement: Measurement::Frequency(metrics),
    })
}

/// Drives any cardinality estimator over the scenario's uniform stream.
pub(crate) fn measure_cardinality<S>(
    scenario: &CardinalityScenario,
    sketch: &mut S,
) -> Result<MetricsRecord, Error>
where
    S: CardinalityEstimator<Key> + ?Sized,
{
    let mut baseline = ExactSet::<Key>::new();

    let generator = StreamGenerator::new(scenario.generator_seed, scenario.cardinality);
    let stream = generator.generate(
        Distribution::Uniform,
        scenario.cardinality,
        scenario.stream_length,
    )?;
    let metrics = compare_cardinality(sketch, &mut baseline, stream);

    Ok(MetricsRecord {
        scenario: Scenario::Cardinality(scenario.clone()),
        sketch_size: sketch.size(),
        baseline_size: baseline.size(),
        measurement: Measurement::Cardinality(metrics),
    })
}
