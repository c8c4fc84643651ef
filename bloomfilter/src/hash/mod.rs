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

use std::hash::Hasher;

mod murmurhash;

pub(crate) use self::murmurhash::MurmurHash3X86_32;

/// Hashes `bytes` with the 32-bit MurmurHash3 under the given seed.
pub(crate) fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut hasher = MurmurHash3X86_32::with_seed(seed);
    hasher.write(bytes);
    hasher.finish32()
}

/// Maps `item` to a bit index in `[0, num_bits)` using the hash function selected by `seed`.
///
/// The 32-bit hash is read as a signed integer and reduced with a non-negative remainder, which
/// yields the same index as `mmh3.hash(item, seed) % num_bits` in Python. Filters built by either
/// implementation set the same bits for the same items.
///
/// # Panics
///
/// Panics if `num_bits` is zero.
///
/// # Examples
///
/// ```
/// # use bloomfilter::bloom::digest;
/// assert_eq!(digest("bonus", 0, 82), 40);
/// assert_eq!(digest("bonus", 0, 82), digest(b"bonus", 0, 82));
/// ```
pub fn digest<T: AsRef<[u8]>>(item: T, seed: u16, num_bits: u64) -> u64 {
    assert!(num_bits > 0, "num_bits must be positive");
    let hash = murmur3_32(item.as_ref(), u32::from(seed)) as i32;
    i128::from(hash).rem_euclid(i128::from(num_bits)) as u64
}
