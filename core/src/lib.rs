//! dictbench-core
//!
//! Measures how dictionary-selection strategies change the compressed
//! size of captured web assets, over interchangeable codec backends.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Codecs and streaming sessions
pub mod compression;
pub mod telemetry;

// Strategies, harness, dictionary builder
pub mod strategy;
pub mod bench;
pub mod dictgen;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::bench::{BenchConfig, CsvSink, Harness, MemorySink, QualityRange, ResultRow, ResultSink, RunSummary};
    pub use crate::compression::{provider, CodecError, CodecProvider, CompressionCodec, StreamingSession};
    pub use crate::dictgen::{build_static_table, ProgressReporter};
    pub use crate::strategy::{replay, total_compressed_size, DictionaryTable, StrategyContext, StrategyKind};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{Asset, BenchError};
}
