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

//! Loads a username list into a Bloom filter and a hash set and compares them.

use std::collections::HashSet;
use std::hint::black_box;
use std::time::Instant;

use anyhow::Result;
use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::Capacity;

use crate::lines::LineSource;
use crate::report::LatencyReport;
use crate::report::MemoryReport;
use crate::report::hash_set_footprint_bytes;

#[derive(Debug)]
pub struct Comparison {
    pub memory: MemoryReport,
    pub latency: LatencyReport,
    /// Lines the Bloom filter failed to recognize; always zero.
    pub false_negatives: u64,
}

/// Builds both structures from `source` and times a lookup of every line against each.
pub fn compare(source: &LineSource, num_items: u64, fpp: f64) -> Result<Comparison> {
    let mut filter = BloomFilter::new(Capacity::Items(num_items), fpp)?;
    let loaded = source.load_into(|line| filter.add(line))?;
    if loaded as u64 > num_items {
        tracing::warn!(
            loaded,
            num_items,
            "source holds more items than the filter was sized for"
        );
    }

    let mut set = HashSet::new();
    source.load_into(|line| {
        set.insert(line.to_string());
    })?;

    let memory = MemoryReport {
        items: loaded as u64,
        hash_set_bits: hash_set_footprint_bytes(&set) as u64 * 8,
        bloom_bits: filter.num_bits(),
    };

    let queries = source.collect()?;

    let start = Instant::now();
    let mut false_negatives = 0;
    for query in &queries {
        if !black_box(filter.check(black_box(query))) {
            false_negatives += 1;
        }
    }
    let bloom = start.elapsed();

    let start = Instant::now();
    for query in &queries {
        black_box(set.contains(black_box(query)));
    }
    let hash_set = start.elapsed();

    tracing::info!(
        items = loaded,
        bits_used = filter.bits_used(),
        load_factor = filter.load_factor(),
        "compared bloom filter with hash set"
    );

    Ok(Comparison {
        memory,
        latency: LatencyReport {
            lookups: queries.len() as u64,
            bloom,
            hash_set,
        },
        false_negatives,
    })
}
