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

use super::BloomFilterBuilder;
use super::Capacity;
use super::digest;
use super::word_and_mask;
use crate::error::Error;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (added items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Use [`BloomFilter::new`] or [`super::BloomFilterBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Target false positive probability (p)
    pub(super) fpp: f64,
    /// Expected number of items (n)
    pub(super) num_items: u64,
    /// Total number of addressable bits (m)
    pub(super) num_bits: u64,
    /// Number of hash functions to use (k)
    pub(super) num_hashes: u16,
    /// Count of bits set to 1 (for statistics)
    pub(super) num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(num_bits / 64)
    pub(super) bit_array: Box<[u64]>,
}

impl BloomFilter {
    /// Creates an empty filter sized by `capacity` for false positive probability `fpp`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `fpp` is not strictly between 0 and 1, the capacity is 0, or the derived bit or item
    /// count is unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::{BloomFilter, Capacity};
    /// let filter = BloomFilter::new(Capacity::Items(160_000), 0.05).unwrap();
    /// assert_eq!(filter.num_bits(), 997_636);
    /// assert_eq!(filter.num_hashes(), 4);
    ///
    /// assert!(BloomFilter::new(Capacity::Bits(0), 0.05).is_err());
    /// assert!(BloomFilter::new(Capacity::Items(10), 1.0).is_err());
    /// ```
    pub fn new(capacity: Capacity, fpp: f64) -> Result<Self, Error> {
        Ok(BloomFilterBuilder::from_capacity(capacity, fpp)?.build())
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** added (or false positive)
    /// - `false`: Item was **definitely not** added
    ///
    /// Stops at the first probe that hits a cleared bit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_item_count(100, 0.01).unwrap().build();
    /// filter.add("apple");
    ///
    /// assert!(filter.check("apple")); // true - was added
    /// assert!(!filter.check("grape")); // false - never added
    /// ```
    pub fn check<T: AsRef<[u8]>>(&self, item: T) -> bool {
        let item = item.as_ref();
        for seed in 0..self.num_hashes {
            if !self.test_bit(digest(item, seed, self.num_bits)) {
                return false;
            }
        }
        true
    }

    /// Adds an item to the filter.
    ///
    /// After insertion, `check(item)` will always return `true`. Adding the same item again
    /// changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_item_count(100, 0.01).unwrap().build();
    ///
    /// filter.add("apple");
    /// filter.add(String::from("pear"));
    /// filter.add([1u8, 2, 3]);
    ///
    /// assert!(filter.check("apple"));
    /// assert!(filter.check(b"pear"));
    /// ```
    pub fn add<T: AsRef<[u8]>>(&mut self, item: T) {
        let item = item.as_ref();
        for seed in 0..self.num_hashes {
            self.set_bit(digest(item, seed, self.num_bits));
        }
    }

    /// Tests and adds an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// This hashes the item once per probe instead of twice for `check()` then `add()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_item_count(100, 0.01).unwrap().build();
    ///
    /// assert!(!filter.check_and_add("apple")); // First insertion
    /// assert!(filter.check_and_add("apple")); // Now it's in the set
    /// ```
    pub fn check_and_add<T: AsRef<[u8]>>(&mut self, item: T) -> bool {
        let item = item.as_ref();
        let mut was_present = true;
        for seed in 0..self.num_hashes {
            was_present &= !self.set_bit(digest(item, seed, self.num_bits));
        }
        was_present
    }

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter will recognize items from either filter
    /// (plus any false positives from either).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleFilter`](crate::error::ErrorKind::IncompatibleFilter)
    /// if the filters differ in bit count or hash count. Use
    /// [`is_compatible()`](Self::is_compatible) to check first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let mut f1 = BloomFilterBuilder::with_item_count(100, 0.01).unwrap().build();
    /// let mut f2 = BloomFilterBuilder::with_item_count(100, 0.01).unwrap().build();
    ///
    /// f1.add("a");
    /// f2.add("b");
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.check("a"));
    /// assert!(f1.check("b"));
    /// ```
    pub fn union(&mut self, other: &BloomFilter) -> Result<(), Error> {
        if !self.is_compatible(other) {
            return Err(Error::incompatible_filter(
                "cannot union filters with different hash families",
            )
            .with_context("num_bits", self.num_bits)
            .with_context("num_hashes", self.num_hashes)
            .with_context("other_num_bits", other.num_bits)
            .with_context("other_num_hashes", other.num_hashes));
        }

        // Count bits during union operation (single pass)
        let mut num_bits_set = 0;
        for (word, other_word) in self.bit_array.iter_mut().zip(other.bit_array.iter()) {
            *word |= *other_word;
            num_bits_set += u64::from(word.count_ones());
        }
        self.num_bits_set = num_bits_set;
        Ok(())
    }

    /// Checks if two filters probe the same bits for the same items.
    ///
    /// Filters are compatible if they have the same:
    /// - Bit count
    /// - Number of hash functions
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.num_bits == other.num_bits && self.num_hashes == other.num_hashes
    }

    /// Returns whether the filter is empty (no items added).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
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

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// A filter holding its expected item count sits near 0.5.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits as f64
    }

    /// Estimates the current false positive probability.
    ///
    /// Uses the approximation: `load_factor^k`
    /// where:
    /// - load_factor = fraction of bits set (bits_used / num_bits)
    /// - k = num_hashes
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes))
    }

    /// Returns the index of every bit probed for `item`, in seed order.
    pub fn digests<T: AsRef<[u8]>>(&self, item: T) -> Vec<u64> {
        let item = item.as_ref();
        (0..self.num_hashes)
            .map(|seed| digest(item, seed, self.num_bits))
            .collect()
    }

    /// Returns whether the bit at `bit_index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `bit_index` is not below [`num_bits()`](Self::num_bits).
    pub fn get_bit(&self, bit_index: u64) -> bool {
        assert!(bit_index < self.num_bits, "bit index out of range");
        self.test_bit(bit_index)
    }

    fn test_bit(&self, bit_index: u64) -> bool {
        let (word_index, mask) = word_and_mask(bit_index);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit and updates the count if it wasn't already set.
    ///
    /// Returns whether the bit was newly set.
    fn set_bit(&mut self, bit_index: u64) -> bool {
        let (word_index, mask) = word_and_mask(bit_index);
        if (self.bit_array[word_index] & mask) == 0 {
            self.bit_array[word_index] |= mask;
            self.num_bits_set += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_by_item_count() {
        let filter = BloomFilter::new(Capacity::Items(1000), 0.01).unwrap();
        assert_eq!(filter.num_bits(), 9586);
        assert_eq!(filter.num_hashes(), 6);
        assert_eq!(filter.num_items(), 1000);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_new_by_bit_count() {
        let filter = BloomFilter::new(Capacity::Bits(1024), 0.05).unwrap();
        assert_eq!(filter.num_bits(), 1024);
        assert_eq!(filter.bit_array.len(), 16);
        assert!(filter.num_items() > 0);
    }

    #[test]
    fn test_add_and_check() {
        let mut filter = BloomFilter::new(Capacity::Items(100), 0.01).unwrap();

        assert!(!filter.check("apple"));
        filter.add("apple");
        assert!(filter.check("apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filter = BloomFilter::new(Capacity::Items(100), 0.01).unwrap();
        filter.add("apple");
        let snapshot = filter.clone();

        filter.add("apple");
        assert_eq!(filter, snapshot);
    }

    #[test]
    fn test_check_and_add() {
        let mut filter = BloomFilter::new(Capacity::Items(100), 0.01).unwrap();

        assert!(!filter.check_and_add(42_u64.to_le_bytes()));
        assert!(filter.check_and_add(42_u64.to_le_bytes()));
        assert!(filter.check(42_u64.to_le_bytes()));
    }

    #[test]
    fn test_digests_match_set_bits() {
        let mut filter = BloomFilter::new(Capacity::Items(13), 0.05).unwrap();
        filter.add("bonus");

        let digests = filter.digests("bonus");
        assert_eq!(digests, vec![40, 75, 61, 17]);
        assert!(digests.iter().all(|bit| filter.get_bit(*bit)));
        assert_eq!(filter.bits_used(), 4);
    }

    #[test]
    fn test_union() {
        let mut f1 = BloomFilter::new(Capacity::Items(100), 0.01).unwrap();
        let mut f2 = BloomFilter::new(Capacity::Items(100), 0.01).unwrap();

        f1.add("a");
        f2.add("b");

        f1.union(&f2).unwrap();
        assert!(f1.check("a"));
        assert!(f1.check("b"));
        assert_eq!(
            f1.bits_used(),
            f1.bit_array.iter().map(|w| u64::from(w.count_ones())).sum::<u64>()
        );
    }

    #[test]
    fn test_union_incompatible() {
        let mut f1 = BloomFilter::new(Capacity::Items(100), 0.01).unwrap();
        let f2 = BloomFilter::new(Capacity::Items(200), 0.01).unwrap();

        assert!(!f1.is_compatible(&f2));
        let err = f1.union(&f2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilter::new(Capacity::Bits(1000), 0.05).unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        filter.add("test");
        assert!(filter.bits_used() > 0);
        assert!(filter.bits_used() <= u64::from(filter.num_hashes()));
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
    }

    #[test]
    #[should_panic(expected = "bit index out of range")]
    fn test_get_bit_out_of_range() {
        let filter = BloomFilter::new(Capacity::Bits(100), 0.05).unwrap();
        filter.get_bit(100);
    }
}
