//! bench/runner.rs
//! Benchmark harness: walks the corpus and replays every
//! `(codec, strategy, quality)` triple on each directory.
use std::path::Path;
use std::sync::Arc;

use crossbeam::channel;
use serde::Serialize;

use crate::bench::config::BenchConfig;
use crate::bench::corpus::{dir_name, discover, load_assets, CorpusDir};
use crate::bench::manifest::load_manifest;
use crate::bench::parallelism::ParallelismProfile;
use crate::bench::report::{ResultRow, ResultSink};
use crate::compression::{providers, CodecError, CodecProvider};
use crate::strategy::{replay, DictionaryTable, ReplayOutcome, StrategyContext, StrategyKind};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{Asset, BenchError};

const PROBE_INPUT: &[u8] = b"dictbench backend probe dictbench backend probe";

/// Everything produced for one corpus directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryReport {
    pub name: String,
    pub assets: usize,
    pub missing: Vec<usize>,
    pub rows: Vec<ResultRow>,
    /// Replays that failed as a whole (the row cell is empty).
    pub failed_replays: usize,
    pub telemetry: TelemetrySnapshot,
}

/// Totals over a whole run, serialisable as the JSON run summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub directories_run: usize,
    pub directories_skipped: usize,
    pub assets: usize,
    pub missing_assets: usize,
    pub failed_replays: usize,
    pub telemetry: TelemetrySnapshot,
}

#[derive(Debug, Clone, Copy)]
struct Job {
    provider: usize,
    strategy: StrategyKind,
    quality: i32,
    row: usize,
    cell: usize,
}

pub struct Harness {
    config: BenchConfig,
    providers: Vec<Arc<dyn CodecProvider>>,
    ctx: StrategyContext,
    profile: ParallelismProfile,
}

impl Harness {
    /// Validate `config`, probe every backend and load the static table
    /// when a selected strategy needs it.
    pub fn new(config: BenchConfig) -> Result<Self, BenchError> {
        config.validate()?;
        let table = if config.strategies.iter().any(StrategyKind::uses_static_table) {
            DictionaryTable::load(&config.dict_dir, config.dictionary_size)?
        } else {
            DictionaryTable::default()
        };
        Self::with_table(config, table)
    }

    /// Like [`Harness::new`] with an already built static table.
    pub fn with_table(config: BenchConfig, table: DictionaryTable) -> Result<Self, BenchError> {
        config.validate()?;
        let providers = providers(&config.codecs);
        for p in &providers {
            probe(p.as_ref())?;
        }

        let ctx = StrategyContext::new(config.dictionary_size, Arc::new(table));
        let profile = ParallelismProfile::from_config(config.workers);
        log::info!(
            "harness ready: codecs={:?} strategies={} dictionary_size={} workers={}",
            config.codecs, config.strategies.len(), config.dictionary_size, profile.worker_count
        );
        Ok(Self { config, providers, ctx, profile })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn context(&self) -> &StrategyContext {
        &self.ctx
    }

    pub fn profile(&self) -> ParallelismProfile {
        self.profile
    }

    /// Union of every selected codec's quality sweep, ascending.
    pub fn qualities(&self) -> Vec<i32> {
        let mut all: Vec<i32> = self
            .config
            .codecs
            .iter()
            .flat_map(|&c| self.config.quality_range(c).iter())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Run every non-skipped directory of the dataset, writing each
    /// directory's rows to `sink` as soon as it completes.
    pub fn run(&self, sink: &mut dyn ResultSink) -> Result<RunSummary, BenchError> {
        self.run_dataset(&self.config.dataset_dir, sink)
    }

    pub fn run_dataset(&self, dataset_dir: &Path, sink: &mut dyn ResultSink) -> Result<RunSummary, BenchError> {
        let mut summary = RunSummary::default();
        let mut counters = TelemetryCounters::default();
        let mut timer = TelemetryTimer::new();

        for dir in discover(dataset_dir)? {
            let records = match load_manifest(&dir) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("skipping {}: {}", dir.display(), e);
                    summary.directories_skipped += 1;
                    continue;
                }
            };
            if records.len() <= self.config.skip_threshold {
                log::info!(
                    "skipping {}: {} assets (threshold {})",
                    dir_name(&dir), records.len(), self.config.skip_threshold
                );
                summary.directories_skipped += 1;
                continue;
            }

            let corpus = timer.time(Stage::Read, || load_assets(&dir, &records));
            let report = self.run_directory(&corpus)?;
            timer.time(Stage::Report, || sink.write_directory(&report.rows))?;

            summary.directories_run += 1;
            summary.assets += report.assets;
            summary.missing_assets += report.missing.len();
            summary.failed_replays += report.failed_replays;
            counters.merge(&report.telemetry.counters);
            timer.stage_times.merge(&report.telemetry.stage_times);
        }

        timer.time(Stage::Report, || sink.finish())?;
        timer.finish();
        summary.telemetry = TelemetrySnapshot::from(&counters, &timer);
        log::info!(
            "run done: {} directories, {} skipped, {} failed replays",
            summary.directories_run, summary.directories_skipped, summary.failed_replays
        );
        Ok(summary)
    }

    pub fn run_directory(&self, corpus: &CorpusDir) -> Result<DirectoryReport, BenchError> {
        let mut report = self.run_assets(&corpus.name, &corpus.assets)?;
        report.missing = corpus.missing.clone();
        Ok(report)
    }

    /// Replay `assets` under every configured triple. Row order is codec
    /// then strategy, as configured, independent of worker scheduling.
    pub fn run_assets(&self, name: &str, assets: &[Asset]) -> Result<DirectoryReport, BenchError> {
        log::info!("{}: {} assets", name, assets.len());

        let mut rows = Vec::new();
        let mut jobs = Vec::new();
        for (provider, p) in self.providers.iter().enumerate() {
            let range = self.config.quality_range(p.codec());
            for &strategy in &self.config.strategies {
                let row = rows.len();
                rows.push(ResultRow {
                    directory: name.to_string(),
                    codec: p.codec(),
                    strategy,
                    cells: range.iter().map(|q| (q, None)).collect(),
                });
                for (cell, quality) in range.iter().enumerate() {
                    jobs.push(Job { provider, strategy, quality, row, cell });
                }
            }
        }

        let outcomes = self.execute(assets, &jobs)?;

        let mut counters = TelemetryCounters::default();
        let mut timer = TelemetryTimer::new();
        let mut failed_replays = 0;
        for (job, outcome) in jobs.iter().zip(outcomes) {
            match outcome {
                Ok(o) => {
                    rows[job.row].cells[job.cell].1 = Some(o.total_compressed);
                    counters.merge(&o.telemetry.counters);
                    timer.stage_times.merge(&o.telemetry.stage_times);
                }
                Err(e) => {
                    log::warn!(
                        "{}: {} {} q{} failed: {}",
                        name, self.providers[job.provider].name(), job.strategy, job.quality, e
                    );
                    failed_replays += 1;
                }
            }
        }
        timer.finish();

        Ok(DirectoryReport {
            name: name.to_string(),
            assets: assets.len(),
            missing: Vec::new(),
            rows,
            failed_replays,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }

    /// Run `jobs` on a scoped worker pool; results come back in job order.
    fn execute(&self, assets: &[Asset], jobs: &[Job]) -> Result<Vec<Result<ReplayOutcome, CodecError>>, BenchError> {
        let (job_tx, job_rx) = channel::unbounded::<(usize, Job)>();
        let (res_tx, res_rx) = channel::unbounded();
        for (slot, job) in jobs.iter().enumerate() {
            job_tx
                .send((slot, *job))
                .map_err(|e| BenchError::Worker(e.to_string()))?;
        }
        drop(job_tx);

        let workers = self.profile.worker_count.min(jobs.len()).max(1);
        crossbeam::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let res_tx = res_tx.clone();
                s.spawn(move |_| {
                    for (slot, job) in job_rx.iter() {
                        let provider = self.providers[job.provider].as_ref();
                        let result = replay(job.strategy, assets, provider, job.quality, &self.ctx);
                        if res_tx.send((slot, result)).is_err() {
                            break;
                        }
                    }
                });
            }
        })
        .map_err(|_| BenchError::Worker("replay worker panicked".into()))?;
        drop(res_tx);

        let mut slots: Vec<Option<Result<ReplayOutcome, CodecError>>> = (0..jobs.len()).map(|_| None).collect();
        for (slot, result) in res_rx.iter() {
            slots[slot] = Some(result);
        }
        slots
            .into_iter()
            .map(|r| r.ok_or_else(|| BenchError::Worker("replay result missing".into())))
            .collect()
    }
}

/// Compress and restore a small input; any failure means the backend is
/// unusable and the run cannot compare anything.
fn probe(p: &dyn CodecProvider) -> Result<(), BenchError> {
    let init = |source: CodecError| BenchError::BackendInit { codec: p.name(), source };
    let quality = *p.quality_range().start();
    let packed = p.compress(PROBE_INPUT, None, quality).map_err(init)?;
    let restored = p.decompress(&packed, None).map_err(init)?;
    if restored != PROBE_INPUT {
        return Err(init(CodecError::Resource {
            codec: p.name(),
            msg: "probe round trip mismatch".into(),
        }));
    }
    Ok(())
}
