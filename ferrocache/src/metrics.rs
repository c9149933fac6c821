//  Copyright 2024 Foyer Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! A point-in-time copy of a cache's [`ferrocache_common::Metrics`] counters,
//! since handing back a live reference would mean holding the `Shared`
//! variant's lock open for as long as the caller keeps the reference.

use ferrocache_common::Metrics;

/// Snapshot of the hit/miss/eviction counters at the moment [`crate::Cache::metrics`] was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub replaces: u64,
    pub removes: u64,
    pub evictions: u64,
}

impl From<&Metrics> for MetricsSnapshot {
    fn from(metrics: &Metrics) -> Self {
        Self {
            hits: metrics.hits(),
            misses: metrics.misses(),
            inserts: metrics.inserts(),
            replaces: metrics.replaces(),
            removes: metrics.removes(),
            evictions: metrics.evictions(),
        }
    }
}

impl MetricsSnapshot {
    /// Fraction of `get` calls that were hits, in `[0.0, 1.0]`; `0.0` if
    /// there have been no `get` calls at all.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
