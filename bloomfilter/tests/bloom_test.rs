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

use std::f64::consts::LN_2;

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::BloomFilterBuilder;
use bloomfilter::bloom::Capacity;
use bloomfilter::bloom::digest;
use bloomfilter::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::le;
use googletest::prelude::near;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

const WORDS_PRESENT: [&str; 13] = [
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

const WORDS_ABSENT: [&str; 7] = [
    "bluff", "war", "humanity", "hurt", "nuke", "gloomy", "blooming",
];

fn random_word(rng: &mut StdRng) -> String {
    let len = rng.random_range(4..16);
    (0..len)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}

#[test]
fn test_sizing_closed_form() {
    let n = 160_000_u64;
    let p = 0.05_f64;
    let filter = BloomFilter::new(Capacity::Items(n), p).unwrap();

    let expected_bits = (-(n as f64 * p.ln()) / (LN_2 * LN_2)).ceil() as u64;
    let expected_hashes = ((expected_bits as f64 / n as f64) * LN_2).floor().max(1.0) as u16;

    assert_eq!(filter.num_bits(), expected_bits);
    assert_eq!(filter.num_bits(), 997_636);
    assert_eq!(filter.num_hashes(), expected_hashes);
    assert_eq!(filter.num_hashes(), 4);
    assert_eq!(filter.num_items(), n);
    assert_eq!(filter.fpp(), p);
}

#[test]
fn test_reconstruction_symmetry() {
    for n in [1, 2, 3, 7, 10, 13, 100, 999, 1000, 12_345, 160_000, 1_000_000] {
        for p in [0.5, 0.3, 0.1, 0.05, 0.01, 0.001, 1e-6] {
            let by_items = BloomFilter::new(Capacity::Items(n), p).unwrap();
            let by_bits = BloomFilter::new(Capacity::Bits(by_items.num_bits()), p).unwrap();

            assert_eq!(by_bits.num_bits(), by_items.num_bits());
            assert_that!(by_bits.num_items(), ge(n - 1));
            assert_that!(by_bits.num_hashes(), ge(by_items.num_hashes().saturating_sub(1)));
        }
    }
}

#[test]
fn test_invalid_parameters() {
    for fpp in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
        let err = BloomFilter::new(Capacity::Items(100), fpp).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "fpp = {fpp}");
        let err = BloomFilter::new(Capacity::Bits(1024), fpp).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "fpp = {fpp}");
    }

    let err = BloomFilter::new(Capacity::Items(0), 0.05).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    let err = BloomFilter::new(Capacity::Bits(0), 0.05).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_invalid_parameter_message() {
    let err = BloomFilterBuilder::with_item_count(100, 1.0).unwrap_err();
    insta::assert_snapshot!(
        err,
        @"InvalidParameter, context: { fpp: 1 } => fpp must be strictly between 0.0 and 1.0"
    );
}

#[test]
fn test_word_set() {
    let mut filter = BloomFilter::new(Capacity::Items(13), 0.05).unwrap();
    assert_eq!(filter.num_bits(), 82);
    assert_eq!(filter.num_hashes(), 4);

    for word in WORDS_PRESENT {
        filter.add(word);
    }

    for word in WORDS_PRESENT {
        assert!(filter.check(word), "{word} must be reported present");
    }
    let false_positives = WORDS_ABSENT
        .iter()
        .filter(|word| filter.check(word))
        .count();
    assert_eq!(false_positives, 0);
    assert_eq!(filter.bits_used(), 39);
}

#[test]
fn test_no_false_negatives() {
    let mut rng = StdRng::seed_from_u64(9001);
    let mut filter = BloomFilter::new(Capacity::Items(2_000), 0.01).unwrap();
    let words: Vec<String> = (0..5_000).map(|_| random_word(&mut rng)).collect();

    // overfill past the expected item count
    for word in &words {
        filter.add(word);
    }
    for word in &words {
        assert!(filter.check(word), "false negative for {word}");
    }
}

#[test]
fn test_monotonicity() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut filter = BloomFilter::new(Capacity::Bits(256), 0.1).unwrap();
    let mut previous = vec![false; 256];

    for _ in 0..200 {
        filter.add(random_word(&mut rng));

        let current: Vec<bool> = (0..256).map(|bit| filter.get_bit(bit)).collect();
        for (before, after) in previous.iter().zip(&current) {
            assert!(!before || *after, "a set bit was cleared");
        }
        let set = current.iter().filter(|bit| **bit).count() as u64;
        assert_eq!(set, filter.bits_used());
        previous = current;
    }
}

#[test]
fn test_digest_is_deterministic() {
    assert_eq!(digest("bonus", 0, 82), 40);
    assert_eq!(digest("bonus", 1, 82), 75);
    assert_eq!(digest("bonus", 2, 82), 61);
    assert_eq!(digest("bonus", 3, 82), 17);

    // mmh3.hash("foo") == -156908512, and Python's % is non-negative
    assert_eq!(digest("foo", 0, 1 << 40), (1 << 40) - 156_908_512);
    assert_eq!(digest("foo", 0, 1000), 488);

    for seed in 0..16 {
        assert_eq!(
            digest("repeatable", seed, 997_636),
            digest(b"repeatable".to_vec(), seed, 997_636)
        );
    }
}

#[test]
fn test_digests_spread_over_seeds() {
    let num_bits = 1 << 16;
    let distinct: std::collections::HashSet<u64> =
        (0..64).map(|seed| digest("spread", seed, num_bits)).collect();
    assert_that!(distinct.len(), ge(60));
}

#[test]
fn test_empirical_false_positive_rate() {
    let n = 10_000;
    let p = 0.05;
    let mut filter = BloomFilter::new(Capacity::Items(n), p).unwrap();

    for i in 0..n {
        filter.add(format!("member-{i}"));
    }

    let queries = 20_000;
    let false_positives = (0..queries)
        .filter(|i| filter.check(format!("outsider-{i}")))
        .count();
    let observed = false_positives as f64 / queries as f64;

    assert_that!(observed, near(p, 0.02));
    assert_that!(filter.load_factor(), near(0.5, 0.05));
    assert_that!(filter.estimated_fpp(), near(p, 0.02));
}

#[test]
fn test_bit_count_mode_uses_budget() {
    let filter = BloomFilterBuilder::with_bit_count(8 * 1024, 0.01)
        .unwrap()
        .build();
    assert_that!(filter.num_bits(), eq(8192));
    assert_that!(filter.num_items(), eq(854));
    assert_that!(filter.num_hashes(), le(7));
}
