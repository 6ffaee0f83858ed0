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

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use super::ENTRY_OVERHEAD_BYTES;
use super::HEADER_BYTES;
use crate::estimator::ByteSize;
use crate::estimator::CardinalityEstimator;
use crate::estimator::MembershipEstimator;

/// An exact set of items.
///
/// # Examples
///
/// ```
/// use sketchbench::exact::ExactSet;
///
/// let mut set = ExactSet::new();
/// set.insert(&"apple".to_string());
/// set.insert(&"apple".to_string());
///
/// assert!(set.contains("apple"));
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.size(), 16 + 4 + 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExactSet<T> {
    items: HashSet<T>,
    payload_bytes: usize,
}

impl<T> ExactSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        ExactSet {
            items: HashSet::new(),
            payload_bytes: 0,
        }
    }

    /// Returns the exact number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the byte footprint estimate of the set.
    pub fn size(&self) -> usize {
        HEADER_BYTES + self.items.len() * ENTRY_OVERHEAD_BYTES + self.payload_bytes
    }

    /// Iterates over the items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Hash + Eq + Clone + ByteSize> ExactSet<T> {
    /// Inserts `item`, returning true if it was not present before.
    pub fn insert(&mut self, item: &T) -> bool {
        if self.items.contains(item) {
            return false;
        }
        self.payload_bytes += item.byte_size();
        self.items.insert(item.clone())
    }
}

impl<T: Hash + Eq> ExactSet<T> {
    /// Returns true if `item` was inserted.
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.contains(item)
    }
}

impl<T: Hash + Eq + Clone + ByteSize> MembershipEstimator<T> for ExactSet<T> {
    fn add(&mut self, item: &T) {
        self.insert(item);
    }

    fn contains(&self, item: &T) -> bool {
        ExactSet::contains(self, item)
    }

    fn size(&self) -> usize {
        ExactSet::size(self)
    }
}

impl<T: Hash + Eq + Clone + ByteSize> CardinalityEstimator<T> for ExactSet<T> {
    fn add(&mut self, item: &T) {
        self.insert(item);
    }

    fn cardinality(&self) -> f64 {
        self.len() as f64
    }

    fn size(&self) -> usize {
        ExactSet::size(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = ExactSet::new();
        assert!(set.insert(&7u64));
        assert!(!set.insert(&7u64));
        assert!(set.contains(&7u64));
        assert!(!set.contains(&8u64));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_size_grows_with_entries() {
        let mut set = ExactSet::new();
        let empty = set.size();
        assert_eq!(empty, HEADER_BYTES);

        set.insert(&1u64);
        assert_eq!(set.size(), HEADER_BYTES + ENTRY_OVERHEAD_BYTES + 8);
        set.insert(&1u64);
        assert_eq!(set.size(), HEADER_BYTES + ENTRY_OVERHEAD_BYTES + 8);
        set.insert(&2u64);
        assert_eq!(set.size(), HEADER_BYTES + 2 * (ENTRY_OVERHEAD_BYTES + 8));
    }

    #[test]
    fn test_cardinality() {
        let mut set = ExactSet::new();
        for i in 0..100u64 {
            CardinalityEstimator::add(&mut set, &(i % 40));
        }
        assert_eq!(CardinalityEstimator::<u64>::cardinality(&set), 40.0);
    }
}
