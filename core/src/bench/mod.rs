//! bench/mod.rs
//! Corpus loading, replay scheduling and result reporting.

pub mod config;
pub mod corpus;
pub mod manifest;
pub mod parallelism;
pub mod report;
pub mod runner;

pub use config::{BenchConfig, QualityRange};
pub use corpus::{discover, load_assets, load_corpus_dir, CorpusDir};
pub use manifest::{load_manifest, parse_manifest, parse_record, ManifestRecord};
pub use parallelism::ParallelismProfile;
pub use report::{CsvSink, MemorySink, ResultRow, ResultSink};
pub use runner::{DirectoryReport, Harness, RunSummary};
