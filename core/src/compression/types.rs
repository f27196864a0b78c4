//! compression/types.rs
//! Codec identifiers, the error taxonomy and the backend traits.
use std::{fmt, io, str::FromStr};
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::constants::codec_ids;

/// Benchmarked compression backends.
#[repr(u16)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    TryFromPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Zstd    = codec_ids::ZSTD,
    Deflate = codec_ids::DEFLATE,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 2] = [CompressionCodec::Zstd, CompressionCodec::Deflate];

    pub fn name(&self) -> &'static str {
        match self {
            CompressionCodec::Zstd => "zstd",
            CompressionCodec::Deflate => "deflate",
        }
    }

    pub fn verify(raw: u16) -> Result<Self, CodecError> {
        Self::try_from_primitive(raw).map_err(|_| CodecError::UnsupportedCodec {
            name: crate::utils::enum_name_or_hex::<CompressionCodec>(raw),
        })
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionCodec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zstd" | "zstandard" => Ok(CompressionCodec::Zstd),
            "deflate" | "zlib" | "gzip" => Ok(CompressionCodec::Deflate),
            other => Err(CodecError::UnsupportedCodec { name: other.to_string() }),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported compression codec: {name}")]
    UnsupportedCodec { name: String },

    /// Invalid quality or dictionary; raised before any backend context exists.
    #[error("codec {codec} configuration error: {msg}")]
    Configuration { codec: &'static str, msg: String },

    /// Backend context could not be created or failed internally.
    #[error("codec {codec} resource error: {msg}")]
    Resource { codec: &'static str, msg: String },

    /// Stream is truncated, corrupted, or was built with another dictionary.
    #[error("codec {codec} corrupt input: {msg}")]
    CorruptInput { codec: &'static str, msg: String },

    /// The sink took fewer bytes than offered. Nothing is lost: `pending`
    /// bytes stay buffered and the next drain resumes right after the
    /// `written` ones. `consumed` counts caller bytes absorbed by the call.
    #[error("incomplete write: sink took {written} bytes, {pending} still pending")]
    IncompleteWrite { consumed: usize, written: usize, pending: usize },

    #[error("streaming session is closed")]
    ClosedSession,

    #[error("compression state error: {0}")]
    StateError(String),

    /// Hard sink failure; buffered output is retained.
    #[error("sink error: {0}")]
    Sink(#[from] io::Error),
}

impl CodecError {
    /// Whether retrying the same session operation can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CodecError::IncompleteWrite { .. } | CodecError::Sink(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, CodecError::Configuration { .. })
    }

    pub fn is_corrupt_input(&self) -> bool {
        matches!(self, CodecError::CorruptInput { .. })
    }
}

/// Flush directive for a compressor step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flush {
    /// Consume input; output may be held back by the backend.
    None,
    /// End of input: emit everything, including the stream trailer.
    Finish,
}

/// Outcome of one backend step over an input view and an output view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub consumed: usize,
    pub produced: usize,
    /// Finish: trailer fully emitted. Decompress: end of stream reached.
    pub done: bool,
}

impl Progress {
    #[inline]
    pub fn is_stalled(&self) -> bool {
        self.consumed == 0 && self.produced == 0 && !self.done
    }
}

// Require Send so trait objects can cross thread boundaries.
pub trait Compressor: Send {
    /// Prime the reference window. Must precede the first compressed byte.
    fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), CodecError>;
    /// Consume up to `input.len()` bytes, produce up to `output.len()` bytes.
    fn compress(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Progress, CodecError>;
}

pub trait Decompressor: Send {
    /// Dictionary the stream was compressed with.
    fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), CodecError>;
    /// Consume up to `input.len()` bytes, produce up to `output.len()` bytes.
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CodecError>;
}
