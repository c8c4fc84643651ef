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

//! # Seeded Bloom filters
//!
//! A Bloom filter answers set-membership queries with either "definitely absent" or "possibly
//! present". Given an expected item count and a target false positive probability, it derives
//! the size of a bit vector and the number of seeded hash probes that minimize false positives.
//! Items that were added are never reported absent.
//!
//! The crate offers two filters that share one sizing model and one hash family:
//!
//! - [`bloom::BloomFilter`]: single-owner filter, mutated through `&mut self`.
//! - [`bloom::ConcurrentBloomFilter`]: lock-free filter backed by atomic words, safe to share
//!   between threads.
//!
//! Both are created through [`bloom::BloomFilterBuilder`] or [`bloom::BloomFilter::new`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod error;

mod hash;
