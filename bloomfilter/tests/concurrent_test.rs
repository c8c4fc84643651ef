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

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::BloomFilterBuilder;
use bloomfilter::bloom::Capacity;
use bloomfilter::bloom::ConcurrentBloomFilter;
use googletest::assert_that;
use googletest::prelude::eq;

const NUM_THREADS: usize = 8;
const ITEMS_PER_THREAD: usize = 2_000;

#[test]
fn test_concurrent_adds_lose_nothing() {
    let filter = Arc::new(
        ConcurrentBloomFilter::new(Capacity::Items((NUM_THREADS * ITEMS_PER_THREAD) as u64), 0.01)
            .unwrap(),
    );
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|tid| {
            let filter = Arc::clone(&filter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITEMS_PER_THREAD {
                    filter.add(format!("user-{tid}-{i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for tid in 0..NUM_THREADS {
        for i in 0..ITEMS_PER_THREAD {
            assert!(filter.check(format!("user-{tid}-{i}")));
        }
    }
}

#[test]
fn test_concurrent_bits_equal_sequential_bits() {
    let concurrent = Arc::new(
        BloomFilterBuilder::with_item_count(4_000, 0.05)
            .unwrap()
            .build_concurrent(),
    );
    let mut sequential = BloomFilter::new(Capacity::Items(4_000), 0.05).unwrap();

    thread::scope(|scope| {
        for tid in 0..4 {
            let concurrent = Arc::clone(&concurrent);
            scope.spawn(move || {
                for i in 0..1_000 {
                    concurrent.add(format!("{tid}:{i}"));
                }
            });
        }
    });
    for tid in 0..4 {
        for i in 0..1_000 {
            sequential.add(format!("{tid}:{i}"));
        }
    }

    assert_that!(concurrent.bits_used(), eq(sequential.bits_used()));
    assert_eq!(concurrent.snapshot(), sequential);
}

#[test]
fn test_checks_run_alongside_adds() {
    let filter = Arc::new(ConcurrentBloomFilter::new(Capacity::Items(10_000), 0.01).unwrap());
    for i in 0..1_000 {
        filter.add(format!("seed-{i}"));
    }

    thread::scope(|scope| {
        let writer = Arc::clone(&filter);
        scope.spawn(move || {
            for i in 0..5_000 {
                writer.add(format!("late-{i}"));
            }
        });
        for _ in 0..4 {
            let reader = Arc::clone(&filter);
            scope.spawn(move || {
                // items added before the readers started are always visible
                for i in 0..1_000 {
                    assert!(reader.check(format!("seed-{i}")));
                }
            });
        }
    });

    for i in 0..5_000 {
        assert!(filter.check(format!("late-{i}")));
    }
}
