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

use std::path::PathBuf;

use anyhow::Result;
use bloombench::lines::LineSource;
use bloombench::trial;
use bloombench::usernames;
use bloombench::words;
use clap::Parser;
use clap::Subcommand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bloombench", about = "Bloom filter membership benchmarks")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Add a fixed word list and report which probe words the filter recognizes
    Words {
        #[arg(long, default_value_t = 13)]
        items: u64,
        #[arg(long, default_value_t = 0.05)]
        fpp: f64,
        /// Seed for shuffling; random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compare memory and lookup latency against a hash set, one username per line
    Usernames {
        input: PathBuf,
        #[arg(long, default_value_t = 160_000)]
        items: u64,
        #[arg(long, default_value_t = 0.05)]
        fpp: f64,
    },

    /// Measure the false positive rate over repeated random trials
    Trial {
        #[arg(long, default_value_t = 10_000)]
        items: u64,
        #[arg(long, default_value_t = 0.05)]
        fpp: f64,
        #[arg(long, default_value_t = 10)]
        trials: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Words { items, fpp, seed } => {
            let outcome = words::run(items, fpp, &mut rng_from(seed))?;
            println!("{outcome}");
        }
        Cmd::Usernames { input, items, fpp } => {
            let comparison = usernames::compare(&LineSource::new(input), items, fpp)?;
            println!("{}", comparison.memory);
            println!("{}", comparison.latency);
            if comparison.false_negatives != 0 {
                anyhow::bail!("{} false negatives", comparison.false_negatives);
            }
        }
        Cmd::Trial {
            items,
            fpp,
            trials,
            seed,
        } => {
            let report = trial::run(items, fpp, trials, &mut rng_from(seed))?;
            println!("{report}");
        }
    }
    Ok(())
}
