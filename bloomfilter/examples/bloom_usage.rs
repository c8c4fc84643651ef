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

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::Capacity;

fn main() {
    // Size the filter for 10,000 items at a 1% false positive probability
    let mut filter = BloomFilter::new(Capacity::Items(10_000), 0.01).unwrap();

    println!("Created Bloom filter for n=10,000, p=0.01");
    println!("Bits: {}", filter.num_bits());
    println!("Hash functions: {}", filter.num_hashes());

    println!("\nAdding 10,000 items...");
    for i in 0..10_000 {
        filter.add(format!("item-{i}"));
    }
    println!("Load factor: {:.3}", filter.load_factor());
    println!("Estimated fpp: {:.4}", filter.estimated_fpp());

    // Every added item is reported present
    let missing = (0..10_000)
        .filter(|i| !filter.check(format!("item-{i}")))
        .count();
    println!("False negatives: {missing}");

    // Items never added are mostly reported absent
    let trials = 100_000;
    let false_positives = (0..trials)
        .filter(|i| filter.check(format!("other-{i}")))
        .count();
    println!(
        "Observed false positive rate: {:.4}",
        false_positives as f64 / trials as f64
    );

    // The same memory budget, sized from the bit count instead
    let budget = BloomFilter::new(Capacity::Bits(filter.num_bits()), 0.01).unwrap();
    println!(
        "\n{} bits support {} items at p=0.01",
        budget.num_bits(),
        budget.num_items()
    );
}
