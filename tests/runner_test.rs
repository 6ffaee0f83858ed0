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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::le;
use sketchbench::bench::BenchmarkRunner;
use sketchbench::bench::CardinalityScenario;
use sketchbench::bench::FrequencyScenario;
use sketchbench::bench::Measurement;
use sketchbench::bench::MembershipScenario;
use sketchbench::bench::Scenario;
use sketchbench::bench::plan;
use sketchbench::error::ErrorKind;
use tracing_test::traced_test;

#[test]
#[traced_test]
fn test_run_logs_scenario() {
    let scenario = Scenario::from(CardinalityScenario::new(1_000, 0.05, 2));
    BenchmarkRunner::new().run(&scenario).unwrap();
    assert!(logs_contain("scenario started: cardinality(cardinality=1000"));
    assert!(logs_contain("scenario finished"));
}

#[test]
#[traced_test]
fn test_rejected_scenario_is_logged_and_skipped() {
    let scenarios = vec![
        Scenario::from(MembershipScenario::new(1_000, 0.1, 0.0)),
        Scenario::from(MembershipScenario::new(1_000, 0.1, 0.05)),
    ];
    let report = BenchmarkRunner::new().run_all(&scenarios).unwrap();
    assert!(logs_contain("scenario rejected"));
    assert!(!report.is_success());
    assert_eq!(report.records().len(), 1);

    let failure = &report.failures()[0];
    assert_eq!(failure.error.kind(), ErrorKind::InvalidParameter);
    assert_that!(failure.error.to_string(), contains_substring("fpp must be in (0, 1)"));
    assert_that!(
        failure.error.to_string(),
        contains_substring("scenario: membership(cardinality=1000")
    );
}

#[test]
fn test_frequency_scenario() {
    let scenario = Scenario::from(FrequencyScenario::new(1_000, 5, 350));
    let record = BenchmarkRunner::new().run(&scenario).unwrap();
    assert!(record.sketch_size > 5 * 350 * 8);

    let Measurement::Frequency(metrics) = record.measurement else {
        panic!("unexpected measurement {:?}", record.measurement);
    };
    assert_that!(metrics.true_cardinality, le(1_000));
    assert!(metrics.top1_estimate >= metrics.top1_true);
    assert_that!(metrics.top_error, le(1.0));
    assert!(metrics.heavy_hitter_recall.is_some());
}

#[test]
fn test_membership_plan_respects_fpp() {
    let report = BenchmarkRunner::with_threads(4)
        .run_all(&plan::membership_plan(10_000, 0.05))
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.records().len(), 10);
    for record in report.records() {
        let Measurement::Membership(metrics) = record.measurement else {
            panic!("unexpected measurement {:?}", record.measurement);
        };
        assert_that!(metrics.false_positive_rate(), le(0.15));
    }
}

#[test]
fn test_records_follow_scenario_order() {
    let scenarios: Vec<Scenario> = plan::cardinality_plan(10_000, 0.1);
    let report = BenchmarkRunner::with_threads(3).run_all(&scenarios).unwrap();
    let ran: Vec<&Scenario> = report.records().iter().map(|r| &r.scenario).collect();
    assert_eq!(ran, scenarios.iter().collect::<Vec<_>>());
}
