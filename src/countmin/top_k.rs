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

/// Bounded set of the items with the largest estimates offered so far.
///
/// Capacity is expected to be small (tens of items); lookups are linear scans.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TopK<T> {
    capacity: usize,
    entries: Vec<(T, u64)>,
}

impl<T: Eq + Clone> TopK<T> {
    /// Records the latest estimate of `item`.
    ///
    /// A tracked item is updated in place. An untracked item is added while there is room, and
    /// otherwise replaces the entry with the smallest estimate if its own estimate is larger.
    pub(super) fn offer(&mut self, item: &T, estimate: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|(tracked, _)| tracked == item) {
            entry.1 = estimate;
            return;
        }
        if self.entries.len() < self.capacity {
            self.entries.push((item.clone(), estimate));
            return;
        }
        let min = self
            .entries
            .iter_mut()
            .min_by_key(|(_, tracked_estimate)| *tracked_estimate);
        if let Some(min) = min {
            if estimate > min.1 {
                *min = (item.clone(), estimate);
            }
        }
    }
}

impl<T> TopK<T> {
    pub(super) fn new(capacity: usize) -> Self {
        TopK {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(super) fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(item, _)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(top: &TopK<&'static str>) -> Vec<(&'static str, u64)> {
        let mut entries = top.entries.clone();
        entries.sort();
        entries
    }

    #[test]
    fn test_fills_to_capacity() {
        let mut top = TopK::new(2);
        top.offer(&"a", 1);
        top.offer(&"b", 2);
        assert_eq!(top.items().count(), 2);
        assert_eq!(tracked(&top), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_updates_in_place() {
        let mut top = TopK::new(2);
        top.offer(&"a", 1);
        top.offer(&"a", 5);
        assert_eq!(tracked(&top), vec![("a", 5)]);
    }

    #[test]
    fn test_replaces_minimum_only_when_larger() {
        let mut top = TopK::new(2);
        top.offer(&"a", 3);
        top.offer(&"b", 7);
        top.offer(&"c", 3);
        assert_eq!(tracked(&top), vec![("a", 3), ("b", 7)]);

        top.offer(&"c", 4);
        assert_eq!(tracked(&top), vec![("b", 7), ("c", 4)]);
    }

    #[test]
    fn test_zero_capacity_tracks_nothing() {
        let mut top = TopK::new(0);
        top.offer(&"a", 100);
        assert_eq!(top.items().count(), 0);
        assert_eq!(top.capacity(), 0);
    }
}
