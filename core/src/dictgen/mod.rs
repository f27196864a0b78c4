//! dictgen/mod.rs
//! Static dictionary builder: one trained dictionary per content type.
//!
//! Samples are every asset of the dataset grouped by canonical content
//! type. Output files follow the table naming rule, so the result loads
//! straight into a `DictionaryTable`.
pub mod progress;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crossbeam::channel::Sender;
use serde::Serialize;

use crate::bench::corpus::discover;
use crate::bench::manifest::load_manifest;
use crate::strategy::DictionaryTable;
use crate::telemetry::{Stage, StageTimes, TelemetryTimer};
use crate::types::BenchError;
use crate::utils::dict_file_name;

pub use progress::{progress_channel, report, ProgressEvent, ProgressReporter};

/// Types with fewer samples are not trained.
pub const MIN_TRAINING_SAMPLES: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct TrainedDictionary {
    pub content_type: String,
    pub samples: usize,
    pub bytes: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub trained: Vec<TrainedDictionary>,
    /// `(content type, reason)`
    pub skipped: Vec<(String, String)>,
    pub stage_times: StageTimes,
}

/// Asset files of the whole dataset, grouped by content type.
pub fn collect_samples(dataset_dir: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>, BenchError> {
    let mut by_type: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for dir in discover(dataset_dir)? {
        let records = match load_manifest(&dir) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping {}: {}", dir.display(), e);
                continue;
            }
        };
        for rec in records {
            by_type
                .entry(rec.content_type)
                .or_default()
                .push(dir.join(rec.index.to_string()));
        }
    }
    Ok(by_type)
}

/// Train a dictionary of at most `dictionary_size` bytes.
pub fn train_dictionary(content_type: &str, samples: &[Vec<u8>], dictionary_size: usize) -> Result<Vec<u8>, BenchError> {
    let failed = |msg: String| BenchError::DictionaryTraining { content_type: content_type.to_string(), msg };
    if samples.len() < MIN_TRAINING_SAMPLES {
        return Err(failed(format!("{} samples, need {}", samples.len(), MIN_TRAINING_SAMPLES)));
    }
    let mut dict = zstd::dict::from_samples(samples, dictionary_size).map_err(|e| failed(e.to_string()))?;
    dict.truncate(dictionary_size);
    Ok(dict)
}

/// Train a dictionary for every content type in the dataset and save the
/// resulting table to `dict_dir`. Per-type failures are logged and listed
/// in `skipped`.
pub fn build_static_table(
    dataset_dir: &Path,
    dict_dir: &Path,
    dictionary_size: usize,
    progress: Option<&Sender<ProgressEvent>>,
) -> Result<BuildSummary, BenchError> {
    let mut timer = TelemetryTimer::new();
    let groups = collect_samples(dataset_dir)?;
    let mut summary = BuildSummary::default();
    if groups.is_empty() {
        log::warn!("no assets under {}; nothing to train", dataset_dir.display());
        return Ok(summary);
    }

    let mut table = DictionaryTable::default();
    for (content_type, files) in groups {
        log::info!("{}: {} samples", content_type, files.len());
        let samples = timer.time(Stage::Read, || read_samples(&content_type, &files, progress));

        let dict = match timer.time(Stage::Train, || train_dictionary(&content_type, &samples, dictionary_size)) {
            Ok(d) if !d.is_empty() => d,
            Ok(_) => {
                log::warn!("{}: trainer returned an empty dictionary", content_type);
                summary.skipped.push((content_type, "empty dictionary".into()));
                continue;
            }
            Err(e) => {
                log::warn!("{}", e);
                summary.skipped.push((content_type, e.to_string()));
                continue;
            }
        };

        log::info!("{}: trained {} byte dictionary", content_type, dict.len());
        summary.trained.push(TrainedDictionary {
            content_type: content_type.clone(),
            samples: samples.len(),
            bytes: dict.len(),
            path: dict_dir.join(dict_file_name(&content_type)),
        });
        table.insert(content_type, dict);
    }

    timer.time(Stage::Report, || table.save(dict_dir))?;
    log::info!("wrote {} dictionaries to {}", table.len(), dict_dir.display());
    summary.stage_times = timer.stage_times;
    Ok(summary)
}

fn read_samples(content_type: &str, files: &[PathBuf], progress: Option<&Sender<ProgressEvent>>) -> Vec<Vec<u8>> {
    let mut samples = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        match fs::read(file) {
            Ok(bytes) if !bytes.is_empty() => samples.push(bytes),
            Ok(_) => {}
            Err(e) => log::warn!("skipping sample {}: {}", file.display(), e),
        }
        if let Some(tx) = progress {
            report(tx, ProgressEvent {
                content_type: content_type.to_string(),
                percent: (i + 1) as f64 * 100.0 / files.len() as f64,
            });
        }
    }
    samples
}
