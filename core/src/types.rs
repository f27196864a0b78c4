use std::{io, path::PathBuf};
use bytes::Bytes;
use thiserror::Error;

use crate::{compression::CodecError, utils::content_type_key};

/// One captured web asset. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// Position in the manifest; also the asset's file name in the corpus directory.
    pub index: usize,
    pub path: String,
    /// Canonical content type (parameters stripped).
    pub content_type: String,
    pub content: Bytes,
}

impl Asset {
    pub fn new(index: usize, path: impl Into<String>, content_type: &str, content: impl Into<Bytes>) -> Self {
        Self {
            index,
            path: path.into(),
            content_type: content_type_key(content_type).to_string(),
            content: content.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Harness-level error covering I/O, codecs, configuration and reporting.
/// - `From<T>` impls enable `?` from every layer below.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("I/O error on {path}: {source}")]
    Path { path: PathBuf, source: io::Error },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Invalid configuration value, rejected before any work starts.
    #[error("config error: {0}")]
    Config(String),

    #[error("manifest error in {path}: {msg}")]
    Manifest { path: PathBuf, msg: String },

    /// A backend cannot even be instantiated; the run cannot compare anything.
    #[error("backend {codec} failed to initialise: {source}")]
    BackendInit { codec: &'static str, source: CodecError },

    #[error("report error: {0}")]
    Report(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dictionary training for {content_type} failed: {msg}")]
    DictionaryTraining { content_type: String, msg: String },

    #[error("worker pool error: {0}")]
    Worker(String),
}

impl BenchError {
    pub fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BenchError::Path { path: path.into(), source }
    }
}
