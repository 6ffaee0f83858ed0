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

//! Cardinality estimation from HyperLogLog registers.

/// Bias correction constant `alpha_m` for `m` registers.
pub(super) fn alpha(num_registers: usize) -> f64 {
    match num_registers {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        m => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

/// Estimates the cardinality from a register array.
///
/// Uses the raw harmonic-mean estimate `alpha_m * m^2 / sum(2^-register)`. While the raw estimate
/// is at most `2.5 * m` and some registers are still zero, linear counting over the empty
/// registers is more accurate and is returned instead.
///
/// Registers are filled from 64-bit hashes, so the large-range correction needed by 32-bit
/// variants near `2^32 / 30` never applies.
pub(super) fn estimate(registers: &[u8]) -> f64 {
    let m = registers.len() as f64;

    let mut inverse_sum = 0.0;
    let mut zeros = 0usize;
    for &register in registers {
        inverse_sum += inv_pow2(register);
        if register == 0 {
            zeros += 1;
        }
    }

    let raw = alpha(registers.len()) * m * m / inverse_sum;
    if raw <= 2.5 * m && zeros > 0 {
        linear_counting(m, zeros as f64)
    } else {
        raw
    }
}

/// Linear counting estimate `m * ln(m / zeros)`.
fn linear_counting(m: f64, zeros: f64) -> f64 {
    m * (m / zeros).ln()
}

/// `2^-value` built directly from the exponent bits.
fn inv_pow2(value: u8) -> f64 {
    f64::from_bits((1023 - u64::from(value)) << 52)
}
