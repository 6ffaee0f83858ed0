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

use crate::common::RandomSource;

const TAYLOR_THRESHOLD: f64 = 1e-8;

/// Zipf sampler over ranks `1..=num_elements` using rejection-inversion.
///
/// Rank `k` is drawn with probability proportional to `1 / k^exponent`. Sampling takes constant
/// memory and expected constant time for any number of elements, which keeps universes of
/// 10^7 keys cheap to stream.
///
/// See W. Hörmann and G. Derflinger, "Rejection-inversion to generate variates from monotone
/// discrete distributions", ACM TOMACS 6(3), 1996.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZipfSampler {
    num_elements: u64,
    exponent: f64,
    h_integral_x1: f64,
    h_integral_num_elements: f64,
    s: f64,
}

impl ZipfSampler {
    /// Creates a sampler; callers guarantee `num_elements >= 1` and a finite `exponent > 0`.
    pub(crate) fn new(num_elements: u64, exponent: f64) -> Self {
        debug_assert!(num_elements >= 1);
        debug_assert!(exponent > 0.0 && exponent.is_finite());

        let mut sampler = ZipfSampler {
            num_elements,
            exponent,
            h_integral_x1: 0.0,
            h_integral_num_elements: 0.0,
            s: 0.0,
        };
        sampler.h_integral_x1 = sampler.h_integral(1.5) - 1.0;
        sampler.h_integral_num_elements = sampler.h_integral(num_elements as f64 + 0.5);
        sampler.s = 2.0 - sampler.h_integral_inverse(sampler.h_integral(2.5) - sampler.h(2.0));
        sampler
    }

    /// Draws a rank in `1..=num_elements`.
    pub(crate) fn sample<R: RandomSource>(&self, rng: &mut R) -> u64 {
        loop {
            let u = self.h_integral_num_elements
                + rng.next_f64() * (self.h_integral_x1 - self.h_integral_num_elements);
            let x = self.h_integral_inverse(u);
            let k = ((x + 0.5) as u64).clamp(1, self.num_elements);
            let kf = k as f64;

            if kf - x <= self.s || u >= self.h_integral(kf + 0.5) - self.h(kf) {
                return k;
            }
        }
    }

    /// `H(x) = ((x^(1-q)) - 1) / (1 - q)`, continuous at `q = 1` where it is `ln(x)`.
    fn h_integral(&self, x: f64) -> f64 {
        let log_x = x.ln();
        helper2((1.0 - self.exponent) * log_x) * log_x
    }

    /// `h(x) = 1 / x^q`.
    fn h(&self, x: f64) -> f64 {
        (-self.exponent * x.ln()).exp()
    }

    fn h_integral_inverse(&self, x: f64) -> f64 {
        let mut t = x * (1.0 - self.exponent);
        if t < -1.0 {
            // Numerical noise near the lower end of the domain.
            t = -1.0;
        }
        (helper1(t) * x).exp()
    }
}

/// `ln(1 + x) / x`, with a Taylor expansion near zero.
fn helper1(x: f64) -> f64 {
    if x.abs() > TAYLOR_THRESHOLD {
        x.ln_1p() / x
    } else {
        1.0 - x * (0.5 - x * (1.0 / 3.0 - 0.25 * x))
    }
}

/// `(e^x - 1) / x`, with a Taylor expansion near zero.
fn helper2(x: f64) -> f64 {
    if x.abs() > TAYLOR_THRESHOLD {
        x.exp_m1() / x
    } else {
        1.0 + x * 0.5 * (1.0 + x * (1.0 / 3.0) * (1.0 + 0.25 * x))
    }
}
