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

//! Benchmark scenarios, the comparison protocol and the runner.
//!
//! A [`Scenario`] names a sketch family, its parameters and the stream that drives it. The
//! [`BenchmarkRunner`] builds the sketch and its exact baseline, feeds both the same stream,
//! and emits one [`MetricsRecord`]:
//!
//! 1. configure the sketch (parameter errors reject the scenario),
//! 2. generate the stream from the scenario's seed,
//! 3. populate sketch and baseline in lockstep,
//! 4. compare their answers,
//! 5. emit the record with both byte footprints.
//!
//! Scenarios rejected with [`InvalidParameter`](crate::error::ErrorKind::InvalidParameter) are
//! logged and skipped by [`BenchmarkRunner::run_all`]; an
//! [`InvariantViolation`](crate::error::ErrorKind::InvariantViolation) halts the run.
//!
//! # Examples
//!
//! ```
//! use sketchbench::bench::BenchmarkRunner;
//! use sketchbench::bench::plan;
//!
//! let report = BenchmarkRunner::with_threads(2)
//!     .run_all(&plan::membership_plan(1_000, 0.05))
//!     .unwrap();
//! assert!(report.is_success());
//! assert_eq!(report.records().len(), 5);
//! ```

mod compare;
mod metrics;
pub mod plan;
mod runner;
mod scenario;

pub use self::compare::compare_cardinality;
pub use self::compare::compare_frequency;
pub use self::compare::compare_membership;
pub use self::metrics::CardinalityMetrics;
pub use self::metrics::FrequencyMetrics;
pub use self::metrics::Measurement;
pub use self::metrics::MembershipMetrics;
pub use self::metrics::MetricsRecord;
pub use self::runner::BenchmarkRunner;
pub use self::runner::RunReport;
pub use self::runner::ScenarioFailure;
pub use self::scenario::CardinalityScenario;
pub use self::scenario::FrequencyScenario;
pub use self::scenario::MEMBERSHIP_GENERATOR_SEED;
pub use self::scenario::MembershipScenario;
pub use self::scenario::Scenario;
