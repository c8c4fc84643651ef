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

//! Size and timing reports comparing a Bloom filter with a hash set.

use std::collections::HashSet;
use std::fmt;
use std::mem::size_of;
use std::time::Duration;

/// Estimates the heap and inline footprint of a `HashSet<String>` in bytes.
///
/// Counts the set header, one slot plus one control byte per bucket of capacity, and the heap
/// buffer of every stored string. Allocator overhead is not included.
pub fn hash_set_footprint_bytes(set: &HashSet<String>) -> usize {
    let slots = set.capacity() * (size_of::<String>() + 1);
    let strings: usize = set.iter().map(String::capacity).sum();
    size_of::<HashSet<String>>() + slots + strings
}

/// Memory footprint of a hash set against the bit vector of a Bloom filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReport {
    pub items: u64,
    pub hash_set_bits: u64,
    pub bloom_bits: u64,
}

impl MemoryReport {
    /// How many times larger the hash set is than the Bloom filter.
    pub fn ratio(&self) -> f64 {
        self.hash_set_bits as f64 / self.bloom_bits as f64
    }
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items loaded: {}", self.items)?;
        writeln!(f, "Size of hash set: {} bits", self.hash_set_bits)?;
        writeln!(f, "Size of bloom filter: {} bits", self.bloom_bits)?;
        write!(f, "Ratio of bloom filter vs hash set: 1 : {:.2}", self.ratio())
    }
}

/// Total time spent on the same lookups against both structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyReport {
    pub lookups: u64,
    pub bloom: Duration,
    pub hash_set: Duration,
}

impl LatencyReport {
    pub fn bloom_avg_nanos(&self) -> f64 {
        average_nanos(self.bloom, self.lookups)
    }

    pub fn hash_set_avg_nanos(&self) -> f64 {
        average_nanos(self.hash_set, self.lookups)
    }
}

fn average_nanos(total: Duration, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total.as_nanos() as f64 / count as f64
}

impl fmt::Display for LatencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lookups: {}", self.lookups)?;
        writeln!(f, "Bloom filter check: {:.1} ns/op", self.bloom_avg_nanos())?;
        write!(f, "Hash set contains: {:.1} ns/op", self.hash_set_avg_nanos())
    }
}

/// Outcome of repeated false positive experiments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialReport {
    pub trials: u32,
    pub queries: u64,
    pub false_positives: u64,
    pub target_fpp: f64,
    pub false_negatives: u64,
}

impl TrialReport {
    pub fn observed_fpp(&self) -> f64 {
        if self.queries == 0 {
            return 0.0;
        }
        self.false_positives as f64 / self.queries as f64
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trials: {}", self.trials)?;
        writeln!(f, "Queries of absent items: {}", self.queries)?;
        writeln!(f, "False positives: {}", self.false_positives)?;
        writeln!(f, "False negatives: {}", self.false_negatives)?;
        write!(
            f,
            "Observed false positive rate: {:.4} (target {:.4})",
            self.observed_fpp(),
            self.target_fpp
        )
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_memory_report() {
        let report = MemoryReport {
            items: 160_000,
            hash_set_bits: 67_109_088,
            bloom_bits: 997_636,
        };
        assert_snapshot!(report, @r"
        Items loaded: 160000
        Size of hash set: 67109088 bits
        Size of bloom filter: 997636 bits
        Ratio of bloom filter vs hash set: 1 : 67.27
        ");
    }

    #[test]
    fn test_latency_report() {
        let report = LatencyReport {
            lookups: 4,
            bloom: Duration::from_nanos(400),
            hash_set: Duration::from_nanos(250),
        };
        assert_eq!(report.bloom_avg_nanos(), 100.0);
        assert_eq!(report.hash_set_avg_nanos(), 62.5);
        assert_snapshot!(report, @r"
        Lookups: 4
        Bloom filter check: 100.0 ns/op
        Hash set contains: 62.5 ns/op
        ");
    }

    #[test]
    fn test_trial_report_without_queries() {
        let report = TrialReport {
            trials: 0,
            queries: 0,
            false_positives: 0,
            target_fpp: 0.05,
            false_negatives: 0,
        };
        assert_eq!(report.observed_fpp(), 0.0);
    }

    #[test]
    fn test_hash_set_footprint_grows_with_items() {
        let empty = HashSet::new();
        let mut set = HashSet::new();
        for i in 0..1000 {
            set.insert(format!("user{i}"));
        }
        assert!(hash_set_footprint_bytes(&set) > hash_set_footprint_bytes(&empty));
        assert!(hash_set_footprint_bytes(&set) >= 1000 * size_of::<String>());
    }
}
