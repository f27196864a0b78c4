//! bench/report.rs
//! Result rows and the sinks they are written to.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::compression::CompressionCodec;
use crate::strategy::StrategyKind;
use crate::types::BenchError;

/// Totals of one `(directory, codec, strategy)` across the quality sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub directory: String,
    pub codec: CompressionCodec,
    pub strategy: StrategyKind,
    /// `(quality, total compressed bytes)`; `None` when the replay failed.
    pub cells: Vec<(i32, Option<u64>)>,
}

impl ResultRow {
    pub fn cell(&self, quality: i32) -> Option<u64> {
        self.cells.iter().find(|(q, _)| *q == quality).and_then(|(_, v)| *v)
    }
}

/// Append-only destination for result rows, fed one directory at a time.
pub trait ResultSink {
    fn write_directory(&mut self, rows: &[ResultRow]) -> Result<(), BenchError>;

    fn finish(&mut self) -> Result<(), BenchError> {
        Ok(())
    }
}

/// CSV with header `codec,strategy,website,q<min>..q<max>`.
///
/// Each directory is flushed as soon as it is written so an interrupted
/// run keeps every finished directory.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    qualities: Vec<i32>,
    header_written: bool,
}

impl CsvSink<File> {
    pub fn create(path: &Path, qualities: Vec<i32>) -> Result<Self, BenchError> {
        let file = File::create(path).map_err(|e| BenchError::path(path, e))?;
        Ok(Self::from_writer(file, qualities))
    }
}

impl<W: Write> CsvSink<W> {
    /// `qualities` are the columns; rows lacking one get an empty field.
    pub fn from_writer(writer: W, mut qualities: Vec<i32>) -> Self {
        qualities.sort_unstable();
        qualities.dedup();
        Self { writer: csv::Writer::from_writer(writer), qualities, header_written: false }
    }

    fn write_header(&mut self) -> Result<(), BenchError> {
        let mut header = vec!["codec".to_string(), "strategy".to_string(), "website".to_string()];
        header.extend(self.qualities.iter().map(|q| format!("q{q}")));
        self.writer.write_record(&header)?;
        self.header_written = true;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, BenchError> {
        self.writer.into_inner().map_err(|e| BenchError::Io(e.into_error()))
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn write_directory(&mut self, rows: &[ResultRow]) -> Result<(), BenchError> {
        if !self.header_written {
            self.write_header()?;
        }
        for row in rows {
            let mut record = vec![row.codec.to_string(), row.strategy.to_string(), row.directory.clone()];
            record.extend(
                self.qualities
                    .iter()
                    .map(|&q| row.cell(q).map(|v| v.to_string()).unwrap_or_default()),
            );
            self.writer.write_record(&record)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), BenchError> {
        if !self.header_written {
            self.write_header()?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps rows in memory; used by tests and library callers.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<ResultRow>,
}

impl ResultSink for MemorySink {
    fn write_directory(&mut self, rows: &[ResultRow]) -> Result<(), BenchError> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }
}
