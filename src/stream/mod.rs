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

//! Deterministic key streams over a fixed universe.
//!
//! A [`StreamGenerator`] draws a universe of distinct 64-bit random integers once from its seed.
//! Streams then sample indices `[0, cardinality)` of that universe, uniformly or with a Zipfian
//! skew, and render the selected integers as decimal [`Key`]s. Because every stream only touches
//! the first `cardinality` universe entries, the true number of distinct keys a stream can contain
//! is known without consulting any sketch.
//!
//! Streams are pure functions of `(seed, universe_size, distribution, cardinality, length)`:
//! generating the same stream twice yields the same keys in the same order.
//!
//! # Usage
//!
//! ```rust
//! use sketchbench::stream::Distribution;
//! use sketchbench::stream::StreamGenerator;
//!
//! let generator = StreamGenerator::new(12345, 1000);
//!
//! let keys: Vec<_> = generator
//!     .generate(Distribution::Zipfian { exponent: 0.5 }, 100, 10)
//!     .unwrap()
//!     .collect();
//! assert_eq!(keys.len(), 10);
//!
//! let again: Vec<_> = generator
//!     .generate(Distribution::Zipfian { exponent: 0.5 }, 100, 10)
//!     .unwrap()
//!     .collect();
//! assert_eq!(keys, again);
//! ```

mod zipf;

use std::borrow::Borrow;
use std::fmt;

use byteorder::ByteOrder;
use byteorder::LE;

use self::zipf::ZipfSampler;
use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::error::Error;
use crate::estimator::ByteSize;
use crate::hash::DEFAULT_SEED;
use crate::hash::hash_bytes;

/// An immutable stream element, compared and hashed by value.
///
/// A key hashes exactly like the `str` it wraps, so sketches give the same answer for
/// `Key::from("x")` and `"x"`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Box<str>);

impl Key {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn from_value(value: u64) -> Self {
        // Decimal rendering of the signed 64-bit value.
        Key((value as i64).to_string().into_boxed_str())
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key(value.into())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key(value.into_boxed_str())
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ByteSize for Key {
    fn byte_size(&self) -> usize {
        self.0.len()
    }
}

/// Sampling distribution over the universe prefix of a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Every index in `[0, cardinality)` is equally likely.
    Uniform,
    /// Index `i` is drawn with probability proportional to `1 / (i + 1)^exponent`.
    Zipfian {
        /// Skew of the distribution; must be finite and positive.
        exponent: f64,
    },
}

impl Distribution {
    fn tag(&self) -> u8 {
        match self {
            Distribution::Uniform => 0,
            Distribution::Zipfian { .. } => 1,
        }
    }

    fn exponent_bits(&self) -> u64 {
        match self {
            Distribution::Uniform => 0,
            Distribution::Zipfian { exponent } => exponent.to_bits(),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Uniform => write!(f, "uniform"),
            Distribution::Zipfian { exponent } => write!(f, "zipf({exponent})"),
        }
    }
}

/// Generates reproducible key streams over a fixed universe.
#[derive(Debug, Clone)]
pub struct StreamGenerator {
    seed: u64,
    universe: Vec<u64>,
}

impl StreamGenerator {
    /// Creates a generator whose universe holds `universe_size` distinct keys drawn from `seed`.
    pub fn new(seed: u64, universe_size: usize) -> Self {
        let mut rng = XorShift64::seeded(seed);
        // Successive xorshift outputs never repeat within its period, so the universe holds
        // distinct values.
        let universe = (0..universe_size).map(|_| rng.next_u64()).collect();
        StreamGenerator { seed, universe }
    }

    /// Returns the seed this generator was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of keys in the universe.
    pub fn universe_size(&self) -> usize {
        self.universe.len()
    }

    /// Returns the universe key at `index`, if it exists.
    pub fn key(&self, index: usize) -> Option<Key> {
        self.universe.get(index).map(|&v| Key::from_value(v))
    }

    /// Returns the first `cardinality` universe keys in universe order.
    pub fn keys(&self, cardinality: usize) -> impl Iterator<Item = Key> + '_ {
        self.universe
            .iter()
            .take(cardinality)
            .map(|&v| Key::from_value(v))
    }

    /// Returns a lazy stream of `length` keys sampled from the first `cardinality` universe keys.
    ///
    /// A stream over zero keys is empty regardless of `length`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if `cardinality`
    /// exceeds the universe size or a Zipfian exponent is not finite and positive.
    pub fn generate(
        &self,
        distribution: Distribution,
        cardinality: usize,
        length: u64,
    ) -> Result<Stream<'_>, Error> {
        if cardinality > self.universe.len() {
            return Err(Error::out_of_range(
                "cardinality",
                cardinality,
                &format!("[0, {}]", self.universe.len()),
            ));
        }
        if let Distribution::Zipfian { exponent } = distribution {
            if !(exponent.is_finite() && exponent > 0.0) {
                return Err(Error::out_of_range("zipf exponent", exponent, "(0, inf)"));
            }
        }

        let sampler = match distribution {
            _ if cardinality == 0 => Sampler::Empty,
            Distribution::Uniform => Sampler::Uniform {
                cardinality: cardinality as u64,
            },
            Distribution::Zipfian { exponent } => {
                Sampler::Zipfian(ZipfSampler::new(cardinality as u64, exponent))
            }
        };
        let remaining = match sampler {
            Sampler::Empty => 0,
            _ => length,
        };

        Ok(Stream {
            universe: &self.universe,
            sampler,
            rng: XorShift64::seeded(self.stream_seed(distribution, cardinality, length)),
            remaining,
        })
    }

    /// Derives the seed of one stream from the generator seed and the stream parameters.
    fn stream_seed(&self, distribution: Distribution, cardinality: usize, length: u64) -> u64 {
        let mut buf = [0u8; 33];
        LE::write_u64(&mut buf[0..8], self.seed);
        LE::write_u64(&mut buf[8..16], self.universe.len() as u64);
        LE::write_u64(&mut buf[16..24], cardinality as u64);
        LE::write_u64(&mut buf[24..32], length ^ distribution.exponent_bits());
        buf[32] = distribution.tag();
        hash_bytes(&buf, DEFAULT_SEED)
    }
}

#[derive(Debug, Clone, Copy)]
enum Sampler {
    Empty,
    Uniform { cardinality: u64 },
    Zipfian(ZipfSampler),
}

/// A finite lazy sequence of keys produced by [`StreamGenerator::generate`].
#[derive(Debug, Clone)]
pub struct Stream<'a> {
    universe: &'a [u64],
    sampler: Sampler,
    rng: XorShift64,
    remaining: u64,
}

impl Stream<'_> {
    /// Returns the number of keys left in the stream.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn next_index(&mut self) -> usize {
        match self.sampler {
            Sampler::Empty => unreachable!("empty streams have no remaining keys"),
            Sampler::Uniform { cardinality } => self.rng.next_below(cardinality) as usize,
            Sampler::Zipfian(zipf) => (zipf.sample(&mut self.rng) - 1) as usize,
        }
    }
}

impl Iterator for Stream<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.next_index();
        Some(Key::from_value(self.universe[index]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
