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

//! Line-oriented string source feeding the benchmarks.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

/// A text file read as one item per line.
///
/// Every call to [`lines()`](Self::lines) reopens the file, so the same source can feed a Bloom
/// filter, then a hash set, then a round of lookups. Lines are trimmed and blank lines skipped.
#[derive(Debug, Clone)]
pub struct LineSource {
    path: PathBuf,
}

impl LineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LineSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file and iterates over its trimmed, non-blank lines.
    pub fn lines(&self) -> Result<impl Iterator<Item = Result<String>> + '_> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let lines = BufReader::new(file).lines().filter_map(move |line| match line {
            Ok(line) => {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then(|| Ok(trimmed.to_string()))
            }
            Err(err) => Some(
                Err(err).with_context(|| format!("failed to read {}", self.path.display())),
            ),
        });
        Ok(lines)
    }

    /// Passes every line to `sink` and returns how many lines were read.
    pub fn load_into(&self, mut sink: impl FnMut(&str)) -> Result<usize> {
        let mut count = 0;
        for line in self.lines()? {
            sink(&line?);
            count += 1;
        }
        tracing::debug!(path = %self.path.display(), count, "loaded lines");
        Ok(count)
    }

    /// Reads every line into memory.
    pub fn collect(&self) -> Result<Vec<String>> {
        self.lines()?.collect()
    }
}
