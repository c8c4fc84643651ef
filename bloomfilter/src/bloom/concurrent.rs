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

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use super::BloomFilter;
use super::BloomFilterBuilder;
use super::Capacity;
use super::digest;
use super::word_and_mask;
use crate::error::Error;

/// A Bloom filter that can be shared between threads.
///
/// Sized and hashed exactly like [`BloomFilter`], but the bit vector is made of atomic words:
/// [`add()`](Self::add) sets bits with `fetch_or` (release) and [`check()`](Self::check) reads
/// them with acquire loads. Both take `&self`, so the filter can be wrapped in an `Arc` and used
/// from many threads without a lock.
///
/// # Consistency
///
/// Setting bits is a monotone OR, so concurrent adds never lose each other's bits and never
/// introduce a false negative for an add that has returned. A `check` that runs while an `add` of
/// the same item is still in flight may observe only some of its bits and return `false`; once
/// that `add` returns, every later `check` returns `true`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// # use bloomfilter::bloom::{Capacity, ConcurrentBloomFilter};
/// let filter = Arc::new(ConcurrentBloomFilter::new(Capacity::Items(4_000), 0.01).unwrap());
///
/// let handles: Vec<_> = (0..4)
///     .map(|tid| {
///         let filter = Arc::clone(&filter);
///         thread::spawn(move || {
///             for i in 0..1000 {
///                 filter.add(format!("item-{tid}-{i}"));
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert!(filter.check("item-0-42"));
/// assert!(filter.check("item-3-999"));
/// ```
#[derive(Debug)]
pub struct ConcurrentBloomFilter {
    fpp: f64,
    num_items: u64,
    num_bits: u64,
    num_hashes: u16,
    bit_array: Box<[AtomicU64]>,
}

impl ConcurrentBloomFilter {
    /// Creates an empty filter sized by `capacity` for false positive probability `fpp`.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`BloomFilter::new`].
    pub fn new(capacity: Capacity, fpp: f64) -> Result<Self, Error> {
        Ok(BloomFilterBuilder::from_capacity(capacity, fpp)?.build_concurrent())
    }

    pub(super) fn from_parts(
        fpp: f64,
        num_items: u64,
        num_bits: u64,
        num_hashes: u16,
        words: Vec<u64>,
    ) -> Self {
        ConcurrentBloomFilter {
            fpp,
            num_items,
            num_bits,
            num_hashes,
            bit_array: words.into_iter().map(AtomicU64::new).collect(),
        }
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Stops at the first probe that hits a cleared bit.
    pub fn check<T: AsRef<[u8]>>(&self, item: T) -> bool {
        let item = item.as_ref();
        (0..self.num_hashes).all(|seed| {
            let (word_index, mask) = word_and_mask(digest(item, seed, self.num_bits));
            (self.bit_array[word_index].load(Ordering::Acquire) & mask) != 0
        })
    }

    /// Adds an item to the filter.
    pub fn add<T: AsRef<[u8]>>(&self, item: T) {
        let item = item.as_ref();
        for seed in 0..self.num_hashes {
            let (word_index, mask) = word_and_mask(digest(item, seed, self.num_bits));
            self.bit_array[word_index].fetch_or(mask, Ordering::Release);
        }
    }

    /// Tests and adds an item, returning whether it was possibly present before.
    ///
    /// When two threads race to add the same new item, exactly one of them sets the first
    /// cleared bit, so at least one of them observes `false`.
    pub fn check_and_add<T: AsRef<[u8]>>(&self, item: T) -> bool {
        let item = item.as_ref();
        let mut was_present = true;
        for seed in 0..self.num_hashes {
            let (word_index, mask) = word_and_mask(digest(item, seed, self.num_bits));
            let previous = self.bit_array[word_index].fetch_or(mask, Ordering::AcqRel);
            was_present &= (previous & mask) != 0;
        }
        was_present
    }

    /// Returns the false positive probability the filter was sized for.
    pub fn fpp(&self) -> f64 {
        self.fpp
    }

    /// Returns the expected number of items, as given or as derived from the bit count.
    pub fn num_items(&self) -> u64 {
        self.num_items
    }

    /// Returns the total number of bits in the filter.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the number of bits set to 1, counted at the time of the call.
    pub fn bits_used(&self) -> u64 {
        self.bit_array
            .iter()
            .map(|word| u64::from(word.load(Ordering::Acquire).count_ones()))
            .sum()
    }

    /// Returns whether no bit has been set yet.
    pub fn is_empty(&self) -> bool {
        self.bit_array
            .iter()
            .all(|word| word.load(Ordering::Acquire) == 0)
    }

    /// Returns the current load factor (fraction of bits set).
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.num_bits as f64
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes))
    }

    /// Copies the current bits into a single-owner [`BloomFilter`].
    ///
    /// Adds that run concurrently with the copy may or may not be included.
    pub fn snapshot(&self) -> BloomFilter {
        let bit_array: Box<[u64]> = self
            .bit_array
            .iter()
            .map(|word| word.load(Ordering::Acquire))
            .collect();
        let num_bits_set = bit_array.iter().map(|w| u64::from(w.count_ones())).sum();

        BloomFilter {
            fpp: self.fpp,
            num_items: self.num_items,
            num_bits: self.num_bits,
            num_hashes: self.num_hashes,
            num_bits_set,
            bit_array,
        }
    }
}

impl From<BloomFilter> for ConcurrentBloomFilter {
    fn from(filter: BloomFilter) -> Self {
        ConcurrentBloomFilter::from_parts(
            filter.fpp,
            filter.num_items,
            filter.num_bits,
            filter.num_hashes,
            filter.bit_array.into_vec(),
        )
    }
}
