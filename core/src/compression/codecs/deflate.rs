//! Deflate (zlib container) via flate2 with a preset dictionary.
//!
//! The zlib header records the dictionary's Adler-32 and the trailer checks
//! the payload, so decoding with the wrong dictionary fails loudly.
use std::ops::RangeInclusive;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::compression::constants::{DEFLATE_MAX_LEVEL, DEFLATE_MIN_LEVEL};
use crate::compression::provider::CodecProvider;
use crate::compression::types::{CodecError, CompressionCodec, Compressor, Decompressor, Flush, Progress};

const CODEC: &str = "deflate";

fn corrupt(msg: impl Into<String>) -> CodecError {
    CodecError::CorruptInput { codec: CODEC, msg: msg.into() }
}

/// Deflate provider: levels 0..=9.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeflateCodec;

impl CodecProvider for DeflateCodec {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Deflate
    }

    fn quality_range(&self) -> RangeInclusive<i32> {
        DEFLATE_MIN_LEVEL..=DEFLATE_MAX_LEVEL
    }

    fn new_compressor(&self, quality: i32) -> Result<Box<dyn Compressor>, CodecError> {
        Ok(Box::new(DeflateCompressor::new(quality)))
    }

    fn new_decompressor(&self) -> Result<Box<dyn Decompressor>, CodecError> {
        Ok(Box::new(DeflateDecompressor::new()))
    }
}

pub struct DeflateCompressor {
    inner: Compress,
    started: bool,
}

impl DeflateCompressor {
    pub fn new(level: i32) -> Self {
        let level = level.clamp(DEFLATE_MIN_LEVEL, DEFLATE_MAX_LEVEL) as u32;
        Self { inner: Compress::new(Compression::new(level), true), started: false }
    }
}

impl Compressor for DeflateCompressor {
    fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), CodecError> {
        if self.started {
            return Err(CodecError::StateError("deflate dictionary set after compression started".into()));
        }
        self.inner
            .set_dictionary(dict)
            .map_err(|e| CodecError::Resource { codec: CODEC, msg: e.to_string() })?;
        Ok(())
    }

    fn compress(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Progress, CodecError> {
        self.started = true;
        let (in0, out0) = (self.inner.total_in(), self.inner.total_out());
        let mode = match flush {
            Flush::None => FlushCompress::None,
            Flush::Finish => FlushCompress::Finish,
        };

        let status = self
            .inner
            .compress(input, output, mode)
            .map_err(|e| CodecError::Resource { codec: CODEC, msg: e.to_string() })?;

        Ok(Progress {
            consumed: (self.inner.total_in() - in0) as usize,
            produced: (self.inner.total_out() - out0) as usize,
            done: matches!(status, Status::StreamEnd),
        })
    }
}

pub struct DeflateDecompressor {
    inner: Decompress,
    dictionary: Option<Vec<u8>>,
    finished: bool,
}

impl DeflateDecompressor {
    pub fn new() -> Self {
        Self { inner: Decompress::new(true), dictionary: None, finished: false }
    }
}

impl Default for DeflateDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for DeflateDecompressor {
    // zlib asks for the dictionary once it has read the header, so keep it until then.
    fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), CodecError> {
        self.dictionary = Some(dict.to_vec());
        Ok(())
    }

    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CodecError> {
        if self.finished {
            if input.is_empty() {
                return Ok(Progress { done: true, ..Progress::default() });
            }
            return Err(corrupt(format!("{} trailing bytes after stream end", input.len())));
        }

        let (in0, out0) = (self.inner.total_in(), self.inner.total_out());
        let result = self.inner.decompress(input, output, FlushDecompress::None);

        match result {
            Ok(status) => {
                self.finished = matches!(status, Status::StreamEnd);
            }
            Err(e) => match e.needs_dictionary() {
                Some(expected) => {
                    let dict = self
                        .dictionary
                        .as_deref()
                        .ok_or_else(|| corrupt("stream requires a preset dictionary"))?;
                    self.inner.set_dictionary(dict).map_err(|_| {
                        corrupt(format!("dictionary mismatch (stream expects adler32 {expected:08x})"))
                    })?;
                }
                None => return Err(corrupt(e.to_string())),
            },
        }

        Ok(Progress {
            consumed: (self.inner.total_in() - in0) as usize,
            produced: (self.inner.total_out() - out0) as usize,
            done: self.finished,
        })
    }
}
