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

//! A small word-membership demonstration.

use std::fmt;

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::Capacity;
use rand::Rng;
use rand::seq::SliceRandom;

/// Words added to the filter.
pub const WORDS_PRESENT: [&str; 13] = [
    "bonus",
    "bonuses",
    "coherent",
    "cohesive",
    "colorful",
    "collaborative",
    "comely",
    "comfort",
    "gems",
    "generosity",
    "generous",
    "genius",
    "singapore",
];

/// Words that are never added, used to probe for false positives.
pub const WORDS_ABSENT: [&str; 7] = [
    "bluff", "war", "humanity", "hurt", "nuke", "gloomy", "blooming",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    ProbablyPresent,
    DefinitelyAbsent,
    FalsePositive,
}

#[derive(Debug, Clone)]
pub struct WordOutcome {
    pub num_bits: u64,
    pub num_hashes: u16,
    pub fpp: f64,
    pub verdicts: Vec<(&'static str, Verdict)>,
}

impl WordOutcome {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.verdicts.iter().filter(|(_, v)| *v == verdict).count()
    }
}

impl fmt::Display for WordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size of resultant bit array: {}", self.num_bits)?;
        writeln!(f, "False positive probability: {}", self.fpp)?;
        writeln!(f, "Number of hash functions: {}", self.num_hashes)?;
        writeln!(f)?;
        for (word, verdict) in &self.verdicts {
            match verdict {
                Verdict::ProbablyPresent => writeln!(f, "'{word}' is probably present")?,
                Verdict::DefinitelyAbsent => writeln!(f, "'{word}' is definitely not present")?,
                Verdict::FalsePositive => writeln!(f, "'{word}' is a false positive")?,
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "Number of words probably present: {}",
            self.count(Verdict::ProbablyPresent)
        )?;
        writeln!(
            f,
            "Number of words definitely absent: {}",
            self.count(Verdict::DefinitelyAbsent)
        )?;
        write!(
            f,
            "Number of false positives: {}",
            self.count(Verdict::FalsePositive)
        )
    }
}

/// Adds [`WORDS_PRESENT`] to a filter sized for `num_items` at `fpp`, then checks every present
/// and absent word in shuffled order.
pub fn run<R: Rng + ?Sized>(
    num_items: u64,
    fpp: f64,
    rng: &mut R,
) -> Result<WordOutcome, bloomfilter::error::Error> {
    let mut filter = BloomFilter::new(Capacity::Items(num_items), fpp)?;

    let mut present = WORDS_PRESENT;
    present.shuffle(rng);
    for word in present {
        filter.add(word);
    }

    let mut test_set: Vec<&'static str> = WORDS_PRESENT.into_iter().chain(WORDS_ABSENT).collect();
    test_set.shuffle(rng);

    let verdicts = test_set
        .into_iter()
        .map(|word| {
            let verdict = if !filter.check(word) {
                Verdict::DefinitelyAbsent
            } else if WORDS_ABSENT.contains(&word) {
                Verdict::FalsePositive
            } else {
                Verdict::ProbablyPresent
            };
            (word, verdict)
        })
        .collect();

    Ok(WordOutcome {
        num_bits: filter.num_bits(),
        num_hashes: filter.num_hashes(),
        fpp: filter.fpp(),
        verdicts,
    })
}
