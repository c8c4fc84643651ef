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

use super::BloomFilter;
use super::ConcurrentBloomFilter;
use crate::error::Error;

pub const MIN_NUM_BITS: u64 = 1;
/// Largest bit vector a filter will allocate: `i32::MAX` words of 64 bits.
pub const MAX_NUM_BITS: u64 = i32::MAX as u64 * 64;
/// Smallest number of hash functions; the derived count is clamped up to it.
pub const MIN_NUM_HASHES: u16 = 1;
/// Largest number of hash functions; the derived count is clamped down to it.
pub const MAX_NUM_HASHES: u16 = i16::MAX as u16;

/// Selects what the size parameter of a new filter means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// Expected number of distinct items `n`; the bit count is derived from it.
    Items(u64),
    /// Fixed number of bits `m`; the supported item count is derived from it.
    Bits(u64),
}

/// Builder for creating [`BloomFilter`] and [`ConcurrentBloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_item_count()`](Self::with_item_count): size for a known workload
/// - [`with_bit_count()`](Self::with_bit_count): work within a fixed memory budget
///
/// All parameters are validated when the builder is created, so [`build()`](Self::build)
/// cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilterBuilder {
    fpp: f64,
    num_items: u64,
    num_bits: u64,
    num_hashes: u16,
}

impl BloomFilterBuilder {
    /// Creates a builder for `num_items` expected items at false positive probability `fpp`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `num_items` is 0, `fpp` is not strictly between 0 and 1, or the derived bit count is
    /// larger than [`MAX_NUM_BITS`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let builder = BloomFilterBuilder::with_item_count(1000, 0.01).unwrap();
    /// assert_eq!(builder.num_bits(), 9586);
    /// assert_eq!(builder.num_hashes(), 6);
    /// ```
    pub fn with_item_count(num_items: u64, fpp: f64) -> Result<Self, Error> {
        Self::from_capacity(Capacity::Items(num_items), fpp)
    }

    /// Creates a builder for a bit vector of exactly `num_bits` bits at false positive
    /// probability `fpp`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `num_bits` is 0 or above [`MAX_NUM_BITS`], `fpp` is not strictly between 0 and 1, or the
    /// bit vector is too small to hold a single item at `fpp`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let builder = BloomFilterBuilder::with_bit_count(9586, 0.01).unwrap();
    /// assert_eq!(builder.num_items(), 1000);
    /// ```
    pub fn with_bit_count(num_bits: u64, fpp: f64) -> Result<Self, Error> {
        Self::from_capacity(Capacity::Bits(num_bits), fpp)
    }

    /// Creates a builder from either construction mode.
    ///
    /// # Errors
    ///
    /// See [`with_item_count()`](Self::with_item_count) and
    /// [`with_bit_count()`](Self::with_bit_count).
    pub fn from_capacity(capacity: Capacity, fpp: f64) -> Result<Self, Error> {
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(
                Error::invalid_parameter("fpp must be strictly between 0.0 and 1.0")
                    .with_context("fpp", fpp),
            );
        }

        let (num_items, num_bits) = match capacity {
            Capacity::Items(0) => {
                return Err(Error::invalid_parameter("num_items must be positive")
                    .with_context("num_items", 0));
            }
            Capacity::Bits(0) => {
                return Err(Error::invalid_parameter("num_bits must be positive")
                    .with_context("num_bits", 0));
            }
            Capacity::Items(n) => (n, Self::suggest_num_bits(n, fpp)),
            Capacity::Bits(m) => (Self::suggest_num_items(m, fpp), m),
        };

        if num_bits < MIN_NUM_BITS || num_bits > MAX_NUM_BITS {
            return Err(
                Error::invalid_parameter(format!("num_bits must be in [{MIN_NUM_BITS}, {MAX_NUM_BITS}]"))
                    .with_context("num_bits", num_bits)
                    .with_context("fpp", fpp),
            );
        }
        if num_items == 0 {
            return Err(
                Error::invalid_parameter("num_bits is too small to hold any item at this fpp")
                    .with_context("num_bits", num_bits)
                    .with_context("fpp", fpp),
            );
        }

        let num_hashes = Self::suggest_num_hashes(num_bits, num_items);
        if (num_bits as f64 / num_items as f64 * LN_2) < 1.0 {
            tracing::warn!(
                num_bits,
                num_items,
                "derived hash count rounds to zero, using {MIN_NUM_HASHES}"
            );
        }
        tracing::debug!(fpp, num_items, num_bits, num_hashes, "sized bloom filter");

        Ok(BloomFilterBuilder {
            fpp,
            num_items,
            num_bits,
            num_hashes,
        })
    }

    /// Returns the false positive probability the filter is sized for.
    pub fn fpp(&self) -> f64 {
        self.fpp
    }

    /// Returns the expected (or supported) number of items.
    pub fn num_items(&self) -> u64 {
        self.num_items
    }

    /// Returns the number of bits the filter will allocate.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions the filter will probe.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Builds the Bloom filter with every bit cleared.
    pub fn build(self) -> BloomFilter {
        BloomFilter {
            fpp: self.fpp,
            num_items: self.num_items,
            num_bits: self.num_bits,
            num_hashes: self.num_hashes,
            num_bits_set: 0,
            bit_array: vec![0u64; self.num_words()].into_boxed_slice(),
        }
    }

    /// Builds a thread-safe Bloom filter with every bit cleared.
    pub fn build_concurrent(self) -> ConcurrentBloomFilter {
        ConcurrentBloomFilter::from_parts(
            self.fpp,
            self.num_items,
            self.num_bits,
            self.num_hashes,
            vec![0u64; self.num_words()],
        )
    }

    fn num_words(&self) -> usize {
        self.num_bits.div_ceil(64) as usize
    }

    /// Suggests the number of bits for `num_items` items at false positive probability `fpp`.
    ///
    /// Formula: `m = ceil(-n * ln(p) / (ln(2)^2))`
    /// where n = num_items, p = fpp
    ///
    /// The result saturates at `u64::MAX`; it is not checked against [`MAX_NUM_BITS`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_num_bits(1000, 0.01);
    /// assert_eq!(bits, 9586); // 9585.06 rounded up
    /// ```
    pub fn suggest_num_bits(num_items: u64, fpp: f64) -> u64 {
        let n = num_items as f64;
        (-(n * fpp.ln()) / (LN_2 * LN_2)).ceil() as u64
    }

    /// Suggests the number of items a bit vector of `num_bits` bits supports at false positive
    /// probability `fpp`.
    ///
    /// Formula: `n = floor(-m * (ln(2)^2) / ln(p))`
    /// where m = num_bits, p = fpp
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let items = BloomFilterBuilder::suggest_num_items(9586, 0.01);
    /// assert_eq!(items, 1000);
    /// ```
    pub fn suggest_num_items(num_bits: u64, fpp: f64) -> u64 {
        let m = num_bits as f64;
        (-(m * (LN_2 * LN_2)) / fpp.ln()).floor() as u64
    }

    /// Suggests the number of hash functions for `num_bits` bits holding `num_items` items.
    ///
    /// Formula: `k = floor((m / n) * ln(2))`
    /// where m = num_bits, n = num_items
    ///
    /// The result is clamped to [`MIN_NUM_HASHES`]..=[`MAX_NUM_HASHES`], so tiny filters still
    /// probe at least one bit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(10_000, 1000), 6); // 6.93 truncated
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(1, 1000), 1);
    /// ```
    pub fn suggest_num_hashes(num_bits: u64, num_items: u64) -> u16 {
        let m = num_bits as f64;
        let n = num_items as f64;

        let k = (m / n * LN_2).floor();
        k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16
    }
}
