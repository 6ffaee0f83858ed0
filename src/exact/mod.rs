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

//! Exact ground-truth structures the sketches are measured against.
//!
//! [`ExactSet`] answers both membership and distinct-count queries exactly, and
//! [`ExactFrequencies`] keeps every item's exact count. Their `size` is a byte footprint estimate
//! (payload bytes of every stored item plus a fixed per-entry overhead) that grows with the number
//! of entries; it is a yardstick for the sketches, not a serialization format.

mod frequencies;
mod set;

pub use self::frequencies::ExactFrequencies;
pub use self::set::ExactSet;

/// Fixed bytes charged once per structure (element count and type header).
const HEADER_BYTES: usize = 16;
/// Fixed bytes charged per stored item (its length prefix).
const ENTRY_OVERHEAD_BYTES: usize = 4;
