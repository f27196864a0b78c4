//! bench/config.rs
//! Run configuration: one explicit value threaded through the harness.
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compression::{resolve, CompressionCodec};
use crate::constants::*;
use crate::strategy::StrategyKind;
use crate::types::BenchError;

/// Inclusive quality sweep for one codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRange {
    pub min: i32,
    pub max: i32,
}

impl QualityRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn iter(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn len(&self) -> usize {
        if self.max < self.min { 0 } else { (self.max.abs_diff(self.min) as usize).saturating_add(1) }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY_MIN, DEFAULT_QUALITY_MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub dataset_dir: PathBuf,
    pub dict_dir: PathBuf,
    /// Shared by every strategy in the run.
    pub dictionary_size: usize,
    /// Directories with at most this many assets are skipped.
    pub skip_threshold: usize,
    pub codecs: Vec<CompressionCodec>,
    pub strategies: Vec<StrategyKind>,
    /// Per-codec sweep; codecs missing here use the default range.
    pub quality_ranges: BTreeMap<CompressionCodec, QualityRange>,
    /// Replay worker threads; 0 sizes the pool from the host.
    pub workers: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            dict_dir: PathBuf::from(DEFAULT_DICT_DIR),
            dictionary_size: DEFAULT_DICTIONARY_SIZE,
            skip_threshold: 0,
            codecs: CompressionCodec::ALL.to_vec(),
            strategies: StrategyKind::ALL.to_vec(),
            quality_ranges: BTreeMap::new(),
            workers: 0,
        }
    }
}

impl BenchConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, BenchError> {
        let text = fs::read_to_string(path).map_err(|e| BenchError::path(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn quality_range(&self, codec: CompressionCodec) -> QualityRange {
        self.quality_ranges.get(&codec).copied().unwrap_or_default()
    }

    pub fn set_quality_range(&mut self, codec: CompressionCodec, range: QualityRange) {
        self.quality_ranges.insert(codec, range);
    }

    /// Reject anything the harness could not honour. Runs before any work.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.dictionary_size == 0 || self.dictionary_size > MAX_DICTIONARY_SIZE {
            return Err(BenchError::Config(format!(
                "dictionary_size {} must be within 1..={}",
                self.dictionary_size, MAX_DICTIONARY_SIZE
            )));
        }
        if self.codecs.is_empty() {
            return Err(BenchError::Config("no codecs selected".into()));
        }
        if self.strategies.is_empty() {
            return Err(BenchError::Config("no strategies selected".into()));
        }
        if has_duplicates(&self.codecs) {
            return Err(BenchError::Config("codec listed more than once".into()));
        }
        if has_duplicates(&self.strategies) {
            return Err(BenchError::Config("strategy listed more than once".into()));
        }

        for &codec in &self.codecs {
            let range = self.quality_range(codec);
            if range.min > range.max {
                return Err(BenchError::Config(format!(
                    "{} quality range {}..={} is empty", codec, range.min, range.max
                )));
            }
            let supported = resolve(codec).quality_range;
            if !supported.contains(&range.min) || !supported.contains(&range.max) {
                return Err(BenchError::Config(format!(
                    "{} quality range {}..={} outside supported {}..={}",
                    codec, range.min, range.max, supported.start(), supported.end()
                )));
            }
        }
        Ok(())
    }
}

fn has_duplicates<T: Ord + Copy>(items: &[T]) -> bool {
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}
