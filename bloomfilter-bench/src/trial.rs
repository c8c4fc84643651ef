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

//! Repeated randomized false positive experiments.

use std::collections::HashSet;

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::Capacity;
use rand::Rng;

use crate::report::TrialReport;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_";

fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(6..16);
    (0..len)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}

/// Draws `count` distinct names that are not in `exclude`.
fn distinct_names<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    exclude: &HashSet<String>,
) -> HashSet<String> {
    let mut names = HashSet::with_capacity(count);
    while names.len() < count {
        let name = random_name(rng);
        if !exclude.contains(&name) {
            names.insert(name);
        }
    }
    names
}

/// Runs `trials` rounds, each filling a fresh filter with `num_items` random names and querying
/// as many names that were never added.
pub fn run<R: Rng + ?Sized>(
    num_items: u64,
    fpp: f64,
    trials: u32,
    rng: &mut R,
) -> Result<TrialReport, bloomfilter::error::Error> {
    let mut report = TrialReport {
        trials,
        queries: 0,
        false_positives: 0,
        target_fpp: fpp,
        false_negatives: 0,
    };

    for trial in 0..trials {
        let mut filter = BloomFilter::new(Capacity::Items(num_items), fpp)?;
        let members = distinct_names(rng, num_items as usize, &HashSet::new());
        let outsiders = distinct_names(rng, num_items as usize, &members);

        for name in &members {
            filter.add(name);
        }

        let false_negatives = members.iter().filter(|name| !filter.check(name)).count() as u64;
        let false_positives = outsiders.iter().filter(|name| filter.check(name)).count() as u64;
        tracing::debug!(trial, false_positives, false_negatives, "finished trial");

        report.queries += outsiders.len() as u64;
        report.false_positives += false_positives;
        report.false_negatives += false_negatives;
    }

    Ok(report)
}
