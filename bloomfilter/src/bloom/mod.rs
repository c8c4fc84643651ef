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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was added, `check()` will always return `true`
//! - **Possible false positives**: `check()` may return `true` for items never added, with a
//!   probability close to the configured `fpp` once the filter holds its expected item count
//! - **Fixed size**: The bit vector is allocated once and never grows, shrinks or clears
//! - **Monotone**: A bit set by `add()` stays set for the lifetime of the filter
//!
//! # Usage
//!
//! ```rust
//! use bloomfilter::bloom::BloomFilter;
//! use bloomfilter::bloom::Capacity;
//!
//! // Size a filter for 13 words with a 5% false positive probability
//! let mut filter = BloomFilter::new(Capacity::Items(13), 0.05).unwrap();
//! assert_eq!(filter.num_bits(), 82);
//! assert_eq!(filter.num_hashes(), 4);
//!
//! filter.add("bonus");
//! filter.add("generous");
//!
//! assert!(filter.check("bonus")); // possibly present
//! assert!(!filter.check("bluff")); // definitely absent
//! ```
//!
//! # Creating Filters
//!
//! A filter is sized in one of two ways, selected by [`Capacity`]:
//!
//! ## By Item Count
//!
//! Give the number of items you expect to store; the bit count is derived:
//!
//! ```text
//! m = ceil(-n * ln(p) / ln(2)^2)
//! ```
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_item_count(160_000, 0.05)
//!     .unwrap()
//!     .build();
//! assert_eq!(filter.num_bits(), 997_636);
//! ```
//!
//! ## By Bit Count
//!
//! Give a fixed memory budget in bits; the item count it supports at `p` is derived:
//!
//! ```text
//! n = floor(-m * ln(2)^2 / ln(p))
//! ```
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_bit_count(997_636, 0.05)
//!     .unwrap()
//!     .build();
//! assert_eq!(filter.num_items(), 160_000);
//! ```
//!
//! In both modes the number of hash functions is `k = floor(m / n * ln(2))`, never less than 1.
//!
//! # Hash Family
//!
//! Probe `s` of an item, for `s` in `0..k`, is the 32-bit MurmurHash3 of the item's bytes under
//! seed `s`, read as a signed integer and reduced modulo `m`. See [`digest`].
//!
//! # Concurrency
//!
//! [`BloomFilter`] follows the usual borrow rules: `add` takes `&mut self`, `check` takes `&self`.
//! [`ConcurrentBloomFilter`] stores its bits in atomic words so that `add` and `check` both take
//! `&self` and may run from many threads at once.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod builder;
mod concurrent;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::Capacity;
pub use self::builder::MAX_NUM_BITS;
pub use self::builder::MAX_NUM_HASHES;
pub use self::builder::MIN_NUM_HASHES;
pub use self::concurrent::ConcurrentBloomFilter;
pub use self::sketch::BloomFilter;
pub use crate::hash::digest;

/// Splits a bit index into the index of its `u64` word and the mask selecting it.
#[inline]
fn word_and_mask(bit_index: u64) -> (usize, u64) {
    let word_index = (bit_index >> 6) as usize; // Equivalent to bit_index / 64
    let bit_offset = bit_index & 63; // Equivalent to bit_index % 64
    (word_index, 1u64 << bit_offset)
}
